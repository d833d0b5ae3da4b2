pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub mod serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde::de::Error;
    use crate::utils::date::DATE_FMT;

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(time.format(DATE_FMT).to_string().as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&str_time, DATE_FMT).map_err(D::Error::custom)
    }
}

// same format for optional timestamps; empty strings and nulls read back as None
pub mod opt_serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde::de::Error;
    use crate::utils::date::DATE_FMT;

    pub fn serialize<S: Serializer>(time: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_str(t.format(DATE_FMT).to_string().as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let str_time: Option<String> = Deserialize::deserialize(deserializer)?;
        match str_time {
            Some(s) if !s.is_empty() => NaiveDateTime::parse_from_str(&s, DATE_FMT).map(Some).map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, Utc};
    use serde::{Deserialize, Serialize};
    use crate::utils::date::{opt_serializer, serializer};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "serializer")]
        at: NaiveDateTime,
        #[serde(with = "opt_serializer", default)]
        until: Option<NaiveDateTime>,
    }

    #[tokio::test]
    async fn test_should_serialize_dates() {
        let stamped = Stamped { at: Utc::now().naive_utc(), until: None };
        let json = serde_json::to_string(&stamped).expect("should serialize");
        let loaded: Stamped = serde_json::from_str(json.as_str()).expect("should deserialize");
        assert_eq!(stamped, loaded);
    }

    #[tokio::test]
    async fn test_should_read_empty_optional_date() {
        let loaded: Stamped = serde_json::from_str(r#"{"at":"2024-01-02T03:04:05.000006","until":""}"#)
            .expect("should deserialize");
        assert_eq!(None, loaded.until);
    }
}
