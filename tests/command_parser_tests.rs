use recap::api::parsing::{parse_command_text, strip_mentions};
use recap::core::models::{CommandAction, DEFAULT_MESSAGE_COUNT, MAX_MESSAGE_COUNT};
use recap::slack::command_parser::{decode_url_component, parse_form_data};

#[test]
fn test_decode_url_component() {
    assert_eq!(decode_url_component("hello%20world").unwrap(), "hello world");
    assert_eq!(decode_url_component("hello+world").unwrap(), "hello world");
    assert_eq!(
        decode_url_component("test%40example.com%26param%3Dvalue").unwrap(),
        "test@example.com&param=value"
    );
}

#[test]
fn test_parse_form_data_success() {
    let form_data = "team_id=T123&channel_id=C123&channel_name=general&user_id=U123&\
                    user_name=username&command=%2Frecap&text=--dm+count%3D10&\
                    response_url=https%3A%2F%2Fhooks.slack.com%2F&trigger_id=123.456";

    let event = parse_form_data(form_data).unwrap();

    assert_eq!(event.team_id, "T123");
    assert_eq!(event.channel_id, "C123");
    assert_eq!(event.user_id, "U123");
    assert_eq!(event.command, "/recap");
    assert_eq!(event.text, "--dm count=10");
    assert_eq!(event.response_url, "https://hooks.slack.com/");
}

#[test]
fn test_parse_form_data_missing_user() {
    assert!(parse_form_data("team_id=T123").is_err());
}

#[test]
fn test_summarize_variants() {
    let args = parse_command_text("summarize 120");
    assert_eq!(args.action, CommandAction::Summarize);
    assert_eq!(args.count, 120);

    let args = parse_command_text("75");
    assert_eq!(args.action, CommandAction::Summarize);
    assert_eq!(args.count, 75);

    let args = parse_command_text("summarize last 30 --dm");
    assert_eq!(args.count, 30);
    assert!(args.via_dm);

    let args = parse_command_text("count=5 --model claude-sonnet");
    assert_eq!(args.count, 5);
    assert_eq!(args.model.as_deref(), Some("claude-sonnet"));
}

#[test]
fn test_count_is_clamped() {
    assert_eq!(parse_command_text("summarize 0").count, 1);
    assert_eq!(parse_command_text("summarize 50000").count, MAX_MESSAGE_COUNT);
    assert_eq!(parse_command_text("summarize count=abc").count, DEFAULT_MESSAGE_COUNT);
}

#[test]
fn test_prompt_collects_question() {
    let args = parse_command_text("prompt what did we decide about 2 releases? count=200");
    assert_eq!(
        args.action,
        CommandAction::Prompt("what did we decide about 2 releases?".to_string())
    );
    assert_eq!(args.count, 200);
}

#[test]
fn test_empty_prompt_falls_back_to_help() {
    assert_eq!(parse_command_text("ask --dm").action, CommandAction::Help);
    assert_eq!(parse_command_text("prompt").action, CommandAction::Help);
}

#[test]
fn test_models_and_help() {
    assert_eq!(parse_command_text("models").action, CommandAction::Models);
    assert_eq!(parse_command_text("HELP me").action, CommandAction::Help);
}

#[test]
fn test_mention_text_is_parsed_after_stripping() {
    let text = strip_mentions("<@U0BOT> summarize 10 model=gpt-4o-mini");
    let args = parse_command_text(&text);
    assert_eq!(args.count, 10);
    assert_eq!(args.model.as_deref(), Some("gpt-4o-mini"));
}
