/// Splits a raw email list as typed in a textarea.
///
/// Separators are whitespace, commas and semicolons. Addresses are trimmed and
/// lower-cased, entries without `@` are dropped, duplicates keep their first
/// position.
pub fn parse_email_list(raw: &str) -> Vec<String> {
    let mut emails: Vec<String> = Vec::new();

    for candidate in raw.split(|c: char| c.is_whitespace() || c == ',' || c == ';') {
        let email = candidate.trim().to_lowercase();
        if email.is_empty() || !is_plausible_email(&email) {
            continue;
        }
        if !emails.contains(&email) {
            emails.push(email);
        }
    }

    emails
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
