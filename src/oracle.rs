use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::{Client, Response};
use tracing::debug;

use crate::ddm::{Coordinate, Ddm};
use crate::error::OracleError;
use crate::fixture::ExampleSet;

pub const BASE_URL: &str = "http://www.hiddenvision.co.uk/ez/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "ddm-verify";
const LAT_FIELD: &str = "nmea_lat";
const LON_FIELD: &str = "nmea_lon";

/// An independent source of reference DDM strings.
pub trait Oracle: Sync {
    fn answer(&self, coord: Coordinate) -> Result<Ddm, OracleError>;
}

impl<F> Oracle for F
where
    F: Fn(Coordinate) -> Result<Ddm, OracleError> + Sync,
{
    fn answer(&self, coord: Coordinate) -> Result<Ddm, OracleError> {
        self(coord)
    }
}

/// Scrapes the hiddenvision.co.uk converter page.
pub struct HiddenVision {
    client: Client,
    base_url: String,
}

impl HiddenVision {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, OracleError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn url(&self, coord: Coordinate) -> String {
        format!(
            "{}?dec_lat={}&dec_lon={}",
            self.base_url, coord.lat, coord.lon
        )
    }

    fn get_page(&self, url: &str) -> Result<Response, reqwest::Error> {
        self.client.get(url).send()?.error_for_status()
    }
}

impl Oracle for HiddenVision {
    fn answer(&self, coord: Coordinate) -> Result<Ddm, OracleError> {
        let url = self.url(coord);
        debug!(%url, "querying oracle");
        let html = self.get_page(&url)?.text()?;
        parse_answer(&html)
    }
}

pub fn parse_answer(html: &str) -> Result<Ddm, OracleError> {
    let lat = extract_input_value(html, LAT_FIELD)
        .ok_or(OracleError::MissingField { field: LAT_FIELD })?;
    let lon = extract_input_value(html, LON_FIELD)
        .ok_or(OracleError::MissingField { field: LON_FIELD })?;
    Ok(Ddm { lat, lon })
}

/// Returns the `value` attribute of the first `<input>` whose `id` is `id`.
pub fn extract_input_value(html: &str, id: &str) -> Option<String> {
    static INPUT: OnceLock<Regex> = OnceLock::new();
    static ATTR: OnceLock<Regex> = OnceLock::new();
    let input = INPUT.get_or_init(|| Regex::new(r"(?is)<input\b[^>]*>").unwrap());
    let attr = ATTR.get_or_init(|| {
        Regex::new(r#"(?i)([a-z_:-]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).unwrap()
    });

    input.find_iter(html).find_map(|tag| {
        let mut found_id = false;
        let mut value = None;
        for caps in attr.captures_iter(tag.as_str()) {
            let content = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            match caps[1].to_ascii_lowercase().as_str() {
                "id" => found_id = content == id,
                "value" => value = Some(content.to_string()),
                _ => {}
            }
        }
        if found_id {
            value
        } else {
            None
        }
    })
}

/// Answers from a previously recorded example set.
pub struct FixtureOracle {
    answers: HashMap<(u64, u64), Ddm>,
}

impl FixtureOracle {
    pub fn new(set: &ExampleSet) -> Self {
        let answers = set
            .iter()
            .map(|(coord, answer)| (key(coord), answer.clone()))
            .collect();
        Self { answers }
    }
}

impl Oracle for FixtureOracle {
    fn answer(&self, coord: Coordinate) -> Result<Ddm, OracleError> {
        self.answers
            .get(&key(coord))
            .cloned()
            .ok_or(OracleError::Unknown(coord))
    }
}

fn key(coord: Coordinate) -> (u64, u64) {
    (coord.lat.to_bits(), coord.lon.to_bits())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><body><form>
        <input type="text" id="dec_lat" value="66.882115">
        <input type="text" value="6652.9269,N" id="nmea_lat" size=12>
        <INPUT TYPE='text' ID='nmea_lon' VALUE='07602.34774,W'/>
        </form></body></html>"#;

    #[test]
    fn test_extract_input_value() {
        assert_eq!(
            extract_input_value(PAGE, "nmea_lat").as_deref(),
            Some("6652.9269,N")
        );
        assert_eq!(
            extract_input_value(PAGE, "nmea_lon").as_deref(),
            Some("07602.34774,W")
        );
        assert_eq!(
            extract_input_value(PAGE, "dec_lat").as_deref(),
            Some("66.882115")
        );
        assert_eq!(extract_input_value(PAGE, "nmea"), None);
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(
            parse_answer(PAGE).unwrap(),
            Ddm::new("6652.9269,N", "07602.34774,W")
        );
        let err = parse_answer(r#"<input id="nmea_lat" value="1.0,N">"#).unwrap_err();
        assert!(matches!(err, OracleError::MissingField { field: "nmea_lon" }));
    }

    #[test]
    fn test_url() {
        let oracle = HiddenVision::new(BASE_URL, DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            oracle.url(Coordinate::new(56.166042, -176.45725)),
            "http://www.hiddenvision.co.uk/ez/?dec_lat=56.166042&dec_lon=-176.45725"
        );
    }

    #[test]
    fn test_fixture_oracle() {
        let known = Coordinate::new(25.092267, 125.987818);
        let set = ExampleSet::new(
            vec![known],
            vec![Ddm::new("2505.53602,N", "12559.26908,E")],
        )
        .unwrap();
        let oracle = FixtureOracle::new(&set);
        assert_eq!(oracle.answer(known).unwrap(), set.answers()[0]);
        assert!(matches!(
            oracle.answer(Coordinate::new(1.0, 1.0)),
            Err(OracleError::Unknown(_))
        ));
    }
}
