//! Delivery-area and opening-hours checks.
//!
//! The delivery zone is defined by text, not coordinates: an address is
//! deliverable when it mentions a known campus location or a general campus
//! keyword.

use std::fmt::Debug;

use jiff::Zoned;

/// Decides whether an address can be delivered to.
pub trait ServiceArea: Send + Sync + Debug {
    fn is_deliverable(&self, address: &str) -> bool;
}

/// Named places on campus. A match here is the strongest signal.
pub const CAMPUS_LOCATIONS: &[&str] = &[
    "edificio a",
    "edificio b",
    "edificio c",
    "edificio d",
    "edificio e",
    "edificio f",
    "edificio g",
    "edificio h",
    "biblioteca",
    "cafetería central",
    "cafeteria central",
    "rectoría",
    "rectoria",
    "estacionamiento principal",
    "laboratorio de cómputo",
    "laboratorio de computo",
    "auditorio",
    "cancha de futbol",
    "cancha de basquet",
    "área verde",
    "area verde",
];

/// Words that place an address on or around campus.
pub const CAMPUS_KEYWORDS: &[&str] = &[
    "cualtos",
    "cu altos",
    "centro universitario",
    "universidad",
    "campus",
    "tepatitlán",
    "tepatitlan",
    "edificio",
    "aula",
    "laboratorio",
    "biblioteca",
    "cafetería",
    "cafeteria",
    "estacionamiento",
    "rectoría",
    "rectoria",
    "coordinación",
    "coordinacion",
];

/// Keywords that put an off-campus address near the university.
const UNIVERSITY_KEYWORDS: &[&str] = &["universidad", "campus", "cualtos"];

/// Where an address falls relative to campus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// A named campus location.
    Campus,
    /// Mentions the university but no specific place.
    University,
    /// Anything else in town.
    Town,
}

impl Zone {
    pub fn of(address: &str) -> Zone {
        let address = normalize(address);
        if contains_any(&address, CAMPUS_LOCATIONS) {
            Zone::Campus
        } else if contains_any(&address, UNIVERSITY_KEYWORDS) {
            Zone::University
        } else {
            Zone::Town
        }
    }

    /// Distance range from the kitchen, in tenths of a kilometre.
    fn distance_tenths_km(self) -> (u32, u32) {
        match self {
            Zone::Campus => (1, 5),
            Zone::University => (5, 20),
            Zone::Town => (20, 50),
        }
    }
}

/// Expected minutes from order to door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryEstimate {
    pub min_minutes: u32,
    pub max_minutes: u32,
}

impl DeliveryEstimate {
    const PREPARATION_MINUTES: u32 = 15;
    const BUFFER_MINUTES: u32 = 5;
    const TRAVEL_MINUTES_PER_KM: u32 = 3;
    const TENTHS_PER_KM: u32 = 10;

    /// Preparation, travel and a buffer for finding the door.
    pub fn for_address(address: &str) -> Self {
        let (near, far) = Zone::of(address).distance_tenths_km();
        let minutes = |tenths: u32| {
            let travel = (tenths * Self::TRAVEL_MINUTES_PER_KM).div_ceil(Self::TENTHS_PER_KM);
            Self::PREPARATION_MINUTES + travel + Self::BUFFER_MINUTES
        };
        Self {
            min_minutes: minutes(near),
            max_minutes: minutes(far),
        }
    }
}

/// The campus keyword predicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampusServiceArea;

impl ServiceArea for CampusServiceArea {
    fn is_deliverable(&self, address: &str) -> bool {
        let address = normalize(address);
        if address.is_empty() {
            return false;
        }
        contains_any(&address, CAMPUS_LOCATIONS) || contains_any(&address, CAMPUS_KEYWORDS)
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Campus place names and their display spelling. Matching is on whole words,
/// ignoring case, with single spaces between words.
const PLACE_NAMES: &[(&str, &str)] = &[
    ("cualtos", "CUAltos"),
    ("cu altos", "CU Altos"),
    ("centro universitario", "Centro Universitario"),
    ("tepatitlán", "Tepatitlán"),
    ("tepatitlan", "Tepatitlán"),
];

/// Tidies an address for display: trims it and spells campus place names
/// and building letters (`edificio c` becomes `Edificio c`) consistently.
///
/// Only the listed names change; everything else is kept as typed.
pub fn format_address(address: &str) -> String {
    let tokens = split_words(address.trim());
    let mut formatted = String::with_capacity(address.len());
    let mut rest = tokens.as_slice();

    while let Some((first, tail)) = rest.split_first() {
        match place_name_at(rest) {
            Some((spelled, used)) => {
                formatted.push_str(&spelled);
                rest = &rest[used..];
            }
            None => {
                formatted.push_str(first);
                rest = tail;
            }
        }
    }
    formatted
}

/// The display spelling of a place name starting at `tokens[0]`, with the
/// number of tokens it covers.
fn place_name_at(tokens: &[&str]) -> Option<(String, usize)> {
    if let [first, " ", letter, ..] = tokens {
        let mut chars = letter.chars();
        if let (Some(building), None) = (chars.next(), chars.next()) {
            if first.eq_ignore_ascii_case("edificio")
                && ('a'..='h').contains(&building.to_ascii_lowercase())
            {
                return Some((format!("Edificio {building}"), 3));
            }
        }
    }

    PLACE_NAMES.iter().find_map(|(name, spelled)| {
        let words: Vec<&str> = name.split(' ').collect();
        let used = words.len() * 2 - 1;
        let window = tokens.get(..used)?;
        let matches = words.iter().enumerate().all(|(n, word)| {
            window[n * 2].to_lowercase() == *word && (n == 0 || window[n * 2 - 1] == " ")
        });
        matches.then(|| (spelled.to_string(), used))
    })
}

/// Splits into alternating runs of alphanumeric and other characters.
fn split_words(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_word = None;
    for (index, c) in s.char_indices() {
        let word = c.is_alphanumeric();
        if in_word.is_some_and(|previous| previous != word) {
            tokens.push(&s[start..index]);
            start = index;
        }
        in_word = Some(word);
    }
    if start < s.len() {
        tokens.push(&s[start..]);
    }
    tokens
}

/// When the kitchen takes delivery orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryHours {
    /// First hour of service, inclusive.
    pub opens: i8,
    /// Hour service stops, exclusive.
    pub closes: i8,
}

impl Default for DeliveryHours {
    fn default() -> Self {
        Self { opens: 11, closes: 23 }
    }
}

/// When delivery is next possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextDelivery {
    Now,
    Today { hour: i8 },
    Tomorrow { hour: i8 },
}

impl DeliveryHours {
    pub fn is_open(&self, hour: i8) -> bool {
        (self.opens..self.closes).contains(&hour)
    }

    pub fn is_open_now(&self) -> bool {
        self.is_open(Zoned::now().hour())
    }

    pub fn next_delivery(&self, hour: i8) -> NextDelivery {
        if hour < self.opens {
            NextDelivery::Today { hour: self.opens }
        } else if hour >= self.closes {
            NextDelivery::Tomorrow { hour: self.opens }
        } else {
            NextDelivery::Now
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campus_addresses_are_deliverable() {
        let area = CampusServiceArea;
        assert!(area.is_deliverable("Edificio C, salón 4"));
        assert!(area.is_deliverable("  BIBLIOTECA planta alta "));
        assert!(area.is_deliverable("Calle Hidalgo 12, Tepatitlán"));
        assert!(area.is_deliverable("Coordinación de Ingeniería"));
    }

    #[test]
    fn test_other_addresses_are_not() {
        let area = CampusServiceArea;
        assert!(!area.is_deliverable("Av. Insurgentes 123, CDMX"));
        assert!(!area.is_deliverable(""));
        assert!(!area.is_deliverable("   "));
    }

    #[test]
    fn test_zones() {
        assert_eq!(Zone::of("Edificio B"), Zone::Campus);
        assert_eq!(Zone::of("Universidad, puerta norte"), Zone::University);
        assert_eq!(Zone::of("Centro, Tepatitlán"), Zone::Town);
    }

    #[test]
    fn test_delivery_estimate_grows_with_distance() {
        let campus = DeliveryEstimate::for_address("Edificio A");
        let town = DeliveryEstimate::for_address("Calle Morelos 5, Tepatitlán");

        assert_eq!(campus, DeliveryEstimate { min_minutes: 21, max_minutes: 22 });
        assert_eq!(town, DeliveryEstimate { min_minutes: 26, max_minutes: 35 });
    }

    #[test]
    fn test_format_address_spells_campus_names() {
        assert_eq!(format_address("  cualtos, edificio c "), "CUAltos, Edificio c");
        assert_eq!(
            format_address("EDIFICIO B salón 4, cu altos"),
            "Edificio B salón 4, CU Altos"
        );
        assert_eq!(
            format_address("centro universitario de los altos, tepatitlan"),
            "Centro Universitario de los altos, Tepatitlán"
        );
    }

    #[test]
    fn test_format_address_needs_whole_words() {
        // Building letters stop at h; longer words are not letters.
        assert_eq!(format_address("edificio z"), "edificio z");
        assert_eq!(format_address("edificio cafetería"), "edificio cafetería");
        assert_eq!(format_address("cualtoss"), "cualtoss");
        assert_eq!(format_address("cu  altos"), "cu  altos");
        assert_eq!(format_address(""), "");
    }

    #[test]
    fn test_delivery_hours() {
        let hours = DeliveryHours::default();
        assert!(!hours.is_open(10));
        assert!(hours.is_open(11));
        assert!(hours.is_open(22));
        assert!(!hours.is_open(23));

        assert_eq!(hours.next_delivery(9), NextDelivery::Today { hour: 11 });
        assert_eq!(hours.next_delivery(15), NextDelivery::Now);
        assert_eq!(hours.next_delivery(23), NextDelivery::Tomorrow { hour: 11 });
    }
}
