mod delivery;

pub use delivery::{TelegramChannelError, TelegramNotificationChannel};
pub use teloxide;
