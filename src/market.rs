/// Campaign markets map onto the per-language template folders by this
/// table. Keys are lowercase country slugs as they appear in campaign
/// data; values are the template folder names in the asset store.
const LANGUAGE_BY_COUNTRY: &[(&str, &str)] = &[
    ("alemanha", "german"),
    ("arabia", "arabian"),
    ("argelia", "arabic"),
    ("australia", "english"),
    ("austria", "german"),
    ("belgica", "french"),
    ("brasil", "portuguese"),
    ("canada", "english-ca"),
    ("egito", "arabic"),
    ("espanha", "spanish"),
    ("eua", "english"),
    ("filipinas", "filipino"),
    ("franca", "french"),
    ("grecia", "greek"),
    ("holanda", "dutch"),
    ("hungria", "hungarian"),
    ("india", "hindi"),
    ("israel", "hebrew"),
    ("italia", "italian"),
    ("japao", "japanese"),
    ("marrocos", "arabic"),
    ("mexico", "spanish"),
    ("nigeria", "english"),
    ("nz", "english"),
    ("polonia", "polish"),
    ("portugal", "portuguese-pt"),
    ("romenia", "romanian"),
    ("russia", "russian"),
    ("suecia", "swedish"),
    ("tailandia", "thai"),
    ("tcheca", "czech"),
    ("tunisia", "arabic"),
    ("turquia", "turkish"),
    ("uk", "english-uk"),
    ("vietna", "vietnamese"),
];

/// Look up the template-folder language for a campaign country slug.
/// Matching is case-insensitive on a trimmed key; unknown countries
/// return `None` and the caller decides whether that is fatal.
pub fn language_for_country(country: &str) -> Option<&'static str> {
    let key = country.trim().to_lowercase();
    LANGUAGE_BY_COUNTRY
        .iter()
        .find(|(c, _)| *c == key)
        .map(|(_, lang)| *lang)
}
