use chrono::{DateTime, Utc};
use std::time::Duration;

pub struct Date(DateTime<Utc>);

impl From<Duration> for Date {
    fn from(du: Duration) -> Self {
        let nano = du.subsec_nanos() / 1_000_000 * 1_000_000;
        Self(DateTime::from_timestamp(du.as_secs() as i64, nano).unwrap_or_default())
    }
}

impl Date {
    pub fn from_secs(secs: u64) -> Self {
        Duration::from_secs(secs).into()
    }

    pub fn format(&self) -> String {
        use chrono::format::Numeric::*;
        use chrono::format::Pad::Zero;
        use chrono::format::{Fixed, Item};

        const PREFIX: &[Item<'static>] = &[
            Item::Numeric(Year, Zero),
            Item::Literal("-"),
            Item::Numeric(Month, Zero),
            Item::Literal("-"),
            Item::Numeric(Day, Zero),
            Item::Literal(" "),
            Item::Numeric(Hour, Zero),
            Item::Literal(":"),
            Item::Numeric(Minute, Zero),
            Item::Literal(":"),
            Item::Numeric(Second, Zero),
        ];

        let ssitem = Item::Fixed(Fixed::Nanosecond3);
        self.0
            .format_with_items(PREFIX.iter().chain([ssitem].iter()))
            .to_string()
    }
}

impl std::fmt::Debug for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.format())
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.format())
    }
}
