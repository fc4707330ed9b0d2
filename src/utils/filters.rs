use slack_morphism::SlackHistoryMessage;
use slack_morphism::events::SlackMessageEventType;

/// Filters a list of Slack messages, retaining only those written by people:
/// no system messages, no bot posts, no commands addressed to this bot.
#[must_use]
pub fn filter_user_messages(
    messages: Vec<SlackHistoryMessage>,
    bot_user_id: Option<&str>,
) -> Vec<SlackHistoryMessage> {
    let bot_mention = bot_user_id.map(|id| format!("<@{id}>"));

    messages
        .into_iter()
        .filter(|msg| {
            let is_user_message = msg.sender.user.is_some() && msg.sender.bot_id.is_none();
            let is_system_message = msg.subtype.as_ref().is_some_and(|subtype| {
                matches!(
                    subtype,
                    SlackMessageEventType::ChannelJoin | SlackMessageEventType::ChannelLeave
                )
            });
            let is_from_this_bot = bot_user_id
                .zip(msg.sender.user.as_ref())
                .is_some_and(|(bot_id, user)| user.0 == bot_id);
            let text = msg.content.text.as_deref().unwrap_or_default();
            let addresses_bot = bot_mention
                .as_deref()
                .is_some_and(|mention| text.contains(mention));

            is_user_message
                && !is_system_message
                && !is_from_this_bot
                && !addresses_bot
                && !text.trim().is_empty()
        })
        .collect()
}
