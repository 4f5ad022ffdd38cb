/// Built-in city gazetteer: lowercase name to (longitude, latitude).
/// Fixed at compile time, lookup only.
pub const CITIES: &[(&str, (f64, f64))] = &[
    // Africa
    ("cairo", (31.2357, 30.0444)),
    ("lagos", (3.3792, 6.5244)),
    ("nairobi", (36.8219, -1.2921)),
    ("johannesburg", (28.0473, -26.2041)),
    ("casablanca", (-7.6167, 33.5731)),
    ("addis ababa", (38.7469, 9.0320)),
    // Asia
    ("tokyo", (139.6917, 35.6895)),
    ("beijing", (116.4074, 39.9042)),
    ("shanghai", (121.4737, 31.2304)),
    ("delhi", (77.1025, 28.7041)),
    ("mumbai", (72.8777, 19.0760)),
    ("bangkok", (100.5018, 13.7563)),
    ("singapore", (103.8198, 1.3521)),
    ("seoul", (126.9780, 37.5665)),
    ("hong kong", (114.1694, 22.3193)),
    ("dubai", (55.2708, 25.2048)),
    ("istanbul", (28.9784, 41.0082)),
    ("jakarta", (106.8456, -6.2088)),
    ("manila", (120.9842, 14.5995)),
    // Europe
    ("london", (-0.1276, 51.5074)),
    ("paris", (2.3522, 48.8566)),
    ("berlin", (13.4050, 52.5200)),
    ("rome", (12.4964, 41.9028)),
    ("madrid", (-3.7038, 40.4168)),
    ("moscow", (37.6173, 55.7558)),
    ("amsterdam", (4.9041, 52.3676)),
    ("vienna", (16.3738, 48.2082)),
    ("stockholm", (18.0686, 59.3293)),
    ("athens", (23.7275, 37.9838)),
    // North America
    ("new york", (-74.0060, 40.7128)),
    ("los angeles", (-118.2437, 34.0522)),
    ("chicago", (-87.6298, 41.8781)),
    ("mexico city", (-99.1332, 19.4326)),
    ("toronto", (-79.3832, 43.6532)),
    ("san francisco", (-122.4194, 37.7749)),
    ("miami", (-80.1918, 25.7617)),
    ("vancouver", (-123.1207, 49.2827)),
    // South America
    ("sao paulo", (-46.6333, -23.5505)),
    ("rio de janeiro", (-43.1729, -22.9068)),
    ("buenos aires", (-58.3816, -34.6037)),
    ("lima", (-77.0428, -12.0464)),
    ("bogota", (-74.0721, 4.7110)),
    ("santiago", (-70.6483, -33.4489)),
    // Oceania
    ("sydney", (151.2093, -33.8688)),
    ("melbourne", (144.9631, -37.8136)),
    ("auckland", (174.7633, -36.8485)),
    ("perth", (115.8605, -31.9505)),
    // Extreme / interesting locations
    ("reykjavik", (-21.8952, 64.1466)),
    ("anchorage", (-149.9003, 61.2181)),
    ("ushuaia", (-68.3029, -54.8019)),
    ("wellington", (174.7787, -41.2865)),
    ("murmansk", (33.0750, 68.9585)),
];

/// Case-insensitive, whitespace-trimmed, exact-match lookup.
pub fn lookup(query: &str) -> Option<(f64, f64)> {
    let needle = query.trim().to_lowercase();
    CITIES
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|&(_, coord)| coord)
}

/// Title-case the matched name for echoing back into the search box
/// ("new york" -> "New York"). Returns `None` on a miss.
pub fn display_name(query: &str) -> Option<String> {
    let needle = query.trim().to_lowercase();
    CITIES
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|&(name, _)| {
            name.split(' ')
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_trims_and_lowercases() {
        let tokyo = lookup("  TOKYO ").expect("tokyo should resolve");
        assert_eq!(tokyo, (139.6917, 35.6895));
    }

    #[test]
    fn lookup_multiword() {
        assert_eq!(lookup("New York"), Some((-74.0060, 40.7128)));
    }

    #[test]
    fn lookup_miss() {
        assert_eq!(lookup("Atlantis"), None);
        assert_eq!(lookup(""), None);
    }

    #[test]
    fn lookup_is_exact_not_fuzzy() {
        assert_eq!(lookup("toky"), None);
        assert_eq!(lookup("tokyo japan"), None);
    }

    #[test]
    fn display_name_title_cases() {
        assert_eq!(display_name(" new york ").as_deref(), Some("New York"));
        assert_eq!(display_name("PARIS").as_deref(), Some("Paris"));
        assert_eq!(display_name("atlantis"), None);
    }

    #[test]
    fn table_names_are_lowercase() {
        for (name, _) in CITIES {
            assert_eq!(*name, name.to_lowercase(), "table keys must be lowercase");
        }
    }
}
