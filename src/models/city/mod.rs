// City module
// Static city-to-IANA-timezone lookup table for search/autocomplete

/// A single row of the city lookup table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityEntry {
    pub city: &'static str,
    pub country: &'static str,
    pub timezone: &'static str,
    pub aliases: &'static [&'static str],
}

/// Major cities organized by region. Read-only; consulted for autocomplete
/// when adding a city to the comparison board.
pub const CITY_TIMEZONES: &[CityEntry] = &[
    // North America
    CityEntry { city: "Los Angeles", country: "USA", timezone: "America/Los_Angeles", aliases: &["LA"] },
    CityEntry { city: "San Francisco", country: "USA", timezone: "America/Los_Angeles", aliases: &["SF", "Bay Area"] },
    CityEntry { city: "Seattle", country: "USA", timezone: "America/Los_Angeles", aliases: &[] },
    CityEntry { city: "Denver", country: "USA", timezone: "America/Denver", aliases: &[] },
    CityEntry { city: "Phoenix", country: "USA", timezone: "America/Phoenix", aliases: &[] },
    CityEntry { city: "Chicago", country: "USA", timezone: "America/Chicago", aliases: &[] },
    CityEntry { city: "Houston", country: "USA", timezone: "America/Chicago", aliases: &[] },
    CityEntry { city: "Dallas", country: "USA", timezone: "America/Chicago", aliases: &[] },
    CityEntry { city: "New York", country: "USA", timezone: "America/New_York", aliases: &["NYC"] },
    CityEntry { city: "Boston", country: "USA", timezone: "America/New_York", aliases: &[] },
    CityEntry { city: "Washington", country: "USA", timezone: "America/New_York", aliases: &["DC", "Washington DC"] },
    CityEntry { city: "Miami", country: "USA", timezone: "America/New_York", aliases: &[] },
    CityEntry { city: "Toronto", country: "Canada", timezone: "America/Toronto", aliases: &[] },
    CityEntry { city: "Vancouver", country: "Canada", timezone: "America/Vancouver", aliases: &[] },
    CityEntry { city: "Montreal", country: "Canada", timezone: "America/Toronto", aliases: &[] },
    CityEntry { city: "Mexico City", country: "Mexico", timezone: "America/Mexico_City", aliases: &["CDMX"] },
    // South America
    CityEntry { city: "Sao Paulo", country: "Brazil", timezone: "America/Sao_Paulo", aliases: &["São Paulo"] },
    CityEntry { city: "Rio de Janeiro", country: "Brazil", timezone: "America/Sao_Paulo", aliases: &["Rio"] },
    CityEntry { city: "Buenos Aires", country: "Argentina", timezone: "America/Argentina/Buenos_Aires", aliases: &[] },
    CityEntry { city: "Santiago", country: "Chile", timezone: "America/Santiago", aliases: &[] },
    CityEntry { city: "Bogota", country: "Colombia", timezone: "America/Bogota", aliases: &["Bogotá"] },
    CityEntry { city: "Lima", country: "Peru", timezone: "America/Lima", aliases: &[] },
    // Europe
    CityEntry { city: "London", country: "UK", timezone: "Europe/London", aliases: &[] },
    CityEntry { city: "Dublin", country: "Ireland", timezone: "Europe/Dublin", aliases: &[] },
    CityEntry { city: "Lisbon", country: "Portugal", timezone: "Europe/Lisbon", aliases: &[] },
    CityEntry { city: "Madrid", country: "Spain", timezone: "Europe/Madrid", aliases: &[] },
    CityEntry { city: "Paris", country: "France", timezone: "Europe/Paris", aliases: &[] },
    CityEntry { city: "Amsterdam", country: "Netherlands", timezone: "Europe/Amsterdam", aliases: &[] },
    CityEntry { city: "Brussels", country: "Belgium", timezone: "Europe/Brussels", aliases: &[] },
    CityEntry { city: "Berlin", country: "Germany", timezone: "Europe/Berlin", aliases: &[] },
    CityEntry { city: "Munich", country: "Germany", timezone: "Europe/Berlin", aliases: &["München"] },
    CityEntry { city: "Zurich", country: "Switzerland", timezone: "Europe/Zurich", aliases: &["Zürich"] },
    CityEntry { city: "Rome", country: "Italy", timezone: "Europe/Rome", aliases: &[] },
    CityEntry { city: "Milan", country: "Italy", timezone: "Europe/Rome", aliases: &["Milano"] },
    CityEntry { city: "Vienna", country: "Austria", timezone: "Europe/Vienna", aliases: &["Wien"] },
    CityEntry { city: "Prague", country: "Czechia", timezone: "Europe/Prague", aliases: &["Praha"] },
    CityEntry { city: "Warsaw", country: "Poland", timezone: "Europe/Warsaw", aliases: &["Warszawa"] },
    CityEntry { city: "Stockholm", country: "Sweden", timezone: "Europe/Stockholm", aliases: &[] },
    CityEntry { city: "Oslo", country: "Norway", timezone: "Europe/Oslo", aliases: &[] },
    CityEntry { city: "Copenhagen", country: "Denmark", timezone: "Europe/Copenhagen", aliases: &["København"] },
    CityEntry { city: "Helsinki", country: "Finland", timezone: "Europe/Helsinki", aliases: &[] },
    CityEntry { city: "Athens", country: "Greece", timezone: "Europe/Athens", aliases: &[] },
    CityEntry { city: "Istanbul", country: "Turkey", timezone: "Europe/Istanbul", aliases: &[] },
    CityEntry { city: "Kyiv", country: "Ukraine", timezone: "Europe/Kyiv", aliases: &["Kiev"] },
    CityEntry { city: "Moscow", country: "Russia", timezone: "Europe/Moscow", aliases: &[] },
    // Africa & Middle East
    CityEntry { city: "Cairo", country: "Egypt", timezone: "Africa/Cairo", aliases: &[] },
    CityEntry { city: "Lagos", country: "Nigeria", timezone: "Africa/Lagos", aliases: &[] },
    CityEntry { city: "Nairobi", country: "Kenya", timezone: "Africa/Nairobi", aliases: &[] },
    CityEntry { city: "Johannesburg", country: "South Africa", timezone: "Africa/Johannesburg", aliases: &["Joburg"] },
    CityEntry { city: "Cape Town", country: "South Africa", timezone: "Africa/Johannesburg", aliases: &[] },
    CityEntry { city: "Tel Aviv", country: "Israel", timezone: "Asia/Jerusalem", aliases: &[] },
    CityEntry { city: "Dubai", country: "UAE", timezone: "Asia/Dubai", aliases: &[] },
    CityEntry { city: "Riyadh", country: "Saudi Arabia", timezone: "Asia/Riyadh", aliases: &[] },
    // Asia
    CityEntry { city: "Karachi", country: "Pakistan", timezone: "Asia/Karachi", aliases: &[] },
    CityEntry { city: "Mumbai", country: "India", timezone: "Asia/Kolkata", aliases: &["Bombay"] },
    CityEntry { city: "Delhi", country: "India", timezone: "Asia/Kolkata", aliases: &["New Delhi"] },
    CityEntry { city: "Bangalore", country: "India", timezone: "Asia/Kolkata", aliases: &["Bengaluru"] },
    CityEntry { city: "Dhaka", country: "Bangladesh", timezone: "Asia/Dhaka", aliases: &[] },
    CityEntry { city: "Bangkok", country: "Thailand", timezone: "Asia/Bangkok", aliases: &[] },
    CityEntry { city: "Jakarta", country: "Indonesia", timezone: "Asia/Jakarta", aliases: &[] },
    CityEntry { city: "Singapore", country: "Singapore", timezone: "Asia/Singapore", aliases: &["SG"] },
    CityEntry { city: "Kuala Lumpur", country: "Malaysia", timezone: "Asia/Kuala_Lumpur", aliases: &["KL"] },
    CityEntry { city: "Ho Chi Minh City", country: "Vietnam", timezone: "Asia/Ho_Chi_Minh", aliases: &["Saigon"] },
    CityEntry { city: "Manila", country: "Philippines", timezone: "Asia/Manila", aliases: &[] },
    CityEntry { city: "Hong Kong", country: "Hong Kong", timezone: "Asia/Hong_Kong", aliases: &["HK"] },
    CityEntry { city: "Shanghai", country: "China", timezone: "Asia/Shanghai", aliases: &[] },
    CityEntry { city: "Beijing", country: "China", timezone: "Asia/Shanghai", aliases: &[] },
    CityEntry { city: "Taipei", country: "Taiwan", timezone: "Asia/Taipei", aliases: &[] },
    CityEntry { city: "Seoul", country: "South Korea", timezone: "Asia/Seoul", aliases: &[] },
    CityEntry { city: "Tokyo", country: "Japan", timezone: "Asia/Tokyo", aliases: &[] },
    CityEntry { city: "Osaka", country: "Japan", timezone: "Asia/Tokyo", aliases: &[] },
    // Oceania
    CityEntry { city: "Perth", country: "Australia", timezone: "Australia/Perth", aliases: &[] },
    CityEntry { city: "Adelaide", country: "Australia", timezone: "Australia/Adelaide", aliases: &[] },
    CityEntry { city: "Brisbane", country: "Australia", timezone: "Australia/Brisbane", aliases: &[] },
    CityEntry { city: "Sydney", country: "Australia", timezone: "Australia/Sydney", aliases: &[] },
    CityEntry { city: "Melbourne", country: "Australia", timezone: "Australia/Melbourne", aliases: &[] },
    CityEntry { city: "Auckland", country: "New Zealand", timezone: "Pacific/Auckland", aliases: &[] },
    CityEntry { city: "Wellington", country: "New Zealand", timezone: "Pacific/Auckland", aliases: &[] },
];

/// Case-insensitive autocomplete over city names, countries and aliases.
/// Prefix matches rank before substring matches; an empty query matches
/// nothing. Never fails.
pub fn search(query: &str) -> Vec<&'static CityEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let matches_query = |text: &str, prefix_only: bool| {
        let text = text.to_lowercase();
        if prefix_only {
            text.starts_with(&query)
        } else {
            text.contains(&query)
        }
    };

    let entry_matches = |entry: &CityEntry, prefix_only: bool| {
        matches_query(entry.city, prefix_only)
            || matches_query(entry.country, prefix_only)
            || entry.aliases.iter().any(|a| matches_query(a, prefix_only))
    };

    let mut results: Vec<&CityEntry> = CITY_TIMEZONES
        .iter()
        .filter(|e| entry_matches(e, true))
        .collect();

    for entry in CITY_TIMEZONES {
        if entry_matches(entry, false) && !results.iter().any(|e| std::ptr::eq(*e, entry)) {
            results.push(entry);
        }
    }

    results
}
