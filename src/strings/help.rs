//! # Help Text
//!
//! Displayed for `.help` and for any command the bot does not know.

pub const MAIN: &str = concat!(
    "**🤖 Newsbot Help**\n",
    "Use: .command _args_\n",
    "\n",
    "**📰 News**\n",
    "* news [n]: Top n cached stories by score (default 3, max 5)\n",
    "* top [seconds]: Live scan for high-score stories (default 5s, max 60s)\n",
    "\n",
    "**💹 Stock**\n",
    "* stock [ticker]: Latest quote\n",
    "\n",
    "**⚡ Misc**\n",
    "* status\n",
    "* help\n"
);
