//! `genie-bot ask`: run one turn from the terminal.

use termimad::MadSkin;

use crate::state::ConcreteBot;

/// Ask `question` as `user_id` and print the answer.
///
/// The reply is the same markdown a channel would receive. It is rendered
/// with termimad unless `raw` is set.
pub async fn ask(
    bot: &ConcreteBot,
    user_id: &str,
    question: &str,
    raw: bool,
) -> anyhow::Result<()> {
    let reply = bot.on_message(user_id, question).await;

    if raw {
        print!("{reply}");
    } else {
        let mut skin = MadSkin::default_dark();
        skin.inline_code.set_fg(termimad::crossterm::style::Color::Yellow);
        skin.print_text(&reply);
    }

    Ok(())
}
