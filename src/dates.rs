use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn parse_iso_date(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw.trim(), ISO_DATE)
}

/// `YYYY-MM-DD` serde helpers for [`Date`] fields.
pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::{parse_iso_date, ISO_DATE};

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        let text = date.format(ISO_DATE).map_err(serde::ser::Error::custom)?;
        s.serialize_str(&text)
    }

    /// Optional date from a query or body field; empty strings count as absent.
    pub fn deserialize_option<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Date>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) if !raw.trim().is_empty() => parse_iso_date(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use time::macros::date;

    use super::*;

    #[derive(Serialize)]
    struct Out {
        #[serde(serialize_with = "iso_date::serialize")]
        day: Date,
    }

    #[derive(Deserialize)]
    struct In {
        #[serde(default, deserialize_with = "iso_date::deserialize_option")]
        day: Option<Date>,
    }

    #[test]
    fn dates_use_iso_format() {
        let json = serde_json::to_string(&Out {
            day: date!(2024 - 03 - 09),
        })
        .unwrap();
        assert_eq!(json, r#"{"day":"2024-03-09"}"#);
    }

    #[test]
    fn missing_or_empty_optional_date_is_none() {
        let set: In = serde_json::from_str(r#"{"day":"2024-12-31"}"#).unwrap();
        assert_eq!(set.day, Some(date!(2024 - 12 - 31)));
        assert!(serde_json::from_str::<In>("{}").unwrap().day.is_none());
        assert!(serde_json::from_str::<In>(r#"{"day":""}"#).unwrap().day.is_none());
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(serde_json::from_str::<In>(r#"{"day":"31/12/2024"}"#).is_err());
        assert!(parse_iso_date("2024-02-30").is_err());
    }
}
