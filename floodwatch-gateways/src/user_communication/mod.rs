mod flood_alert_formatter;

pub use self::flood_alert_formatter::*;
