//! Parser for the BOM district forecast XML product.
//!
//! The document nests `area` elements (keyed by AAC) containing
//! `forecast-period` elements, whose children are the forecast fields. A
//! `<text type="...">` child is keyed by its `type` attribute; any other child
//! is keyed by its tag name. Only areas matching the requested AAC are kept.

use crate::bom::error::BomError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashMap;

/// One forecast period for an area, with its free-form field map. A field
/// whose element carries no text serializes as `null`, not an empty string.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastPeriod {
    pub area: String,
    pub start_time: String,
    pub end_time: String,
    pub forecast: HashMap<String, Option<String>>,
}

fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, BomError> {
    for attr in element.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == name.as_bytes() {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

/// Key under which a forecast field is stored: the `type` attribute for
/// `<text>` elements, the tag name for everything else.
fn field_key(element: &BytesStart<'_>, tag: &str) -> Result<String, BomError> {
    if tag == "text" {
        Ok(attribute(element, "type")?.unwrap_or_else(|| "text".to_string()))
    } else {
        Ok(tag.to_string())
    }
}

/// Extracts the forecast periods for the area whose AAC matches `aac`,
/// preserving document order. Malformed XML fails the whole parse.
pub fn parse_forecast_for_area(xml: &str, aac: &str) -> Result<Vec<ForecastPeriod>, BomError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut periods = Vec::new();
    let mut in_matching_area = false;
    let mut area_name = String::new();
    let mut current_period: Option<ForecastPeriod> = None;
    let mut current_key: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                match tag.as_str() {
                    "area" => {
                        let element_aac = attribute(&e, "aac")?.unwrap_or_default();
                        in_matching_area = element_aac == aac;
                        if in_matching_area {
                            area_name = attribute(&e, "description")?.unwrap_or_default();
                        }
                    }
                    "forecast-period" if in_matching_area => {
                        current_period = Some(ForecastPeriod {
                            area: area_name.clone(),
                            start_time: attribute(&e, "start-time-local")?.unwrap_or_default(),
                            end_time: attribute(&e, "end-time-local")?.unwrap_or_default(),
                            forecast: HashMap::new(),
                        });
                    }
                    _ => {
                        if let Some(period) = current_period.as_mut() {
                            let key = field_key(&e, &tag)?;
                            period.forecast.insert(key.clone(), None);
                            current_key = Some(key);
                        }
                    }
                }
            }
            Event::Empty(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                if let Some(period) = current_period.as_mut() {
                    if tag != "forecast-period" {
                        let key = field_key(&e, &tag)?;
                        period.forecast.insert(key, None);
                    }
                }
            }
            Event::Text(t) => {
                if let (Some(period), Some(key)) = (current_period.as_mut(), current_key.as_ref()) {
                    period
                        .forecast
                        .insert(key.clone(), Some(t.unescape()?.into_owned()));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"area" => in_matching_area = false,
                b"forecast-period" => {
                    if let Some(period) = current_period.take() {
                        periods.push(period);
                    }
                }
                _ => current_key = None,
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(periods)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<product version="1.7">
  <forecast>
    <area aac="WA_PT053" description="Perth" type="location">
      <forecast-period start-time-local="2024-05-01T00:00:00+08:00" end-time-local="2024-05-02T00:00:00+08:00" index="0">
        <element type="forecast_icon_code">3</element>
        <text type="precis">Partly cloudy.</text>
        <text type="probability_of_precipitation">20%</text>
      </forecast-period>
      <forecast-period start-time-local="2024-05-02T00:00:00+08:00" end-time-local="2024-05-03T00:00:00+08:00" index="1">
        <element type="forecast_icon_code">11</element>
        <text type="precis">Showers.</text>
        <text type="uv_alert"></text>
      </forecast-period>
    </area>
    <area aac="WA_PT054" description="Mandurah" type="location">
      <forecast-period start-time-local="2024-05-01T00:00:00+08:00" end-time-local="2024-05-02T00:00:00+08:00" index="0">
        <text type="precis">Sunny.</text>
      </forecast-period>
    </area>
  </forecast>
</product>"#;

    #[test]
    fn keeps_only_requested_area_in_document_order() {
        let periods = parse_forecast_for_area(SAMPLE, "WA_PT053").unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].area, "Perth");
        assert_eq!(periods[0].forecast["precis"].as_deref(), Some("Partly cloudy."));
        assert_eq!(periods[1].forecast["precis"].as_deref(), Some("Showers."));
        assert!(periods[0].start_time < periods[1].start_time);
    }

    #[test]
    fn text_elements_are_keyed_by_type_and_others_by_tag() {
        let periods = parse_forecast_for_area(SAMPLE, "WA_PT053").unwrap();
        let forecast = &periods[0].forecast;
        assert_eq!(forecast["element"].as_deref(), Some("3"));
        assert_eq!(forecast["probability_of_precipitation"].as_deref(), Some("20%"));
    }

    #[test]
    fn textless_fields_serialize_as_null() {
        let periods = parse_forecast_for_area(SAMPLE, "WA_PT053").unwrap();
        assert_eq!(periods[1].forecast["uv_alert"], None);
        let value = serde_json::to_value(&periods[1]).unwrap();
        assert!(value["forecast"]["uv_alert"].is_null());
        assert_eq!(value["forecast"]["precis"], "Showers.");
    }

    #[test]
    fn unknown_area_yields_empty_list() {
        let periods = parse_forecast_for_area(SAMPLE, "WA_PT999").unwrap();
        assert!(periods.is_empty());
    }

    #[test]
    fn malformed_xml_fails_the_whole_parse() {
        assert!(parse_forecast_for_area("<product><area aac=", "WA_PT053").is_err());
    }
}
