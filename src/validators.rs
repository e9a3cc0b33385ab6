//! Field validators run synchronously before anything touches the database
//! or the trip store. `None` means the value is acceptable.

pub const MIN_PASSWORD_LEN: usize = 5;

pub fn email_validator(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some("Email cannot be empty.");
    }
    if !looks_like_email(value) {
        return Some("Ooops! We need a valid email address.");
    }
    None
}

pub fn password_validator(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some("Password cannot be empty.");
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 5 characters long.");
    }
    None
}

pub fn name_validator(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some("Name cannot be empty.");
    }
    None
}

// local@domain with a dot somewhere in the domain and no whitespace.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_email_is_rejected() {
        assert!(email_validator("").is_some());
    }

    #[test]
    fn malformed_email_is_rejected() {
        assert!(email_validator("not-an-email").is_some());
        assert!(email_validator("missing@tld").is_some());
        assert!(email_validator("@b.com").is_some());
        assert!(email_validator("a b@c.com").is_some());
    }

    #[test]
    fn plain_email_passes() {
        assert!(email_validator("a@b.com").is_none());
        assert!(email_validator("crew+beach@cleanup.example.org").is_none());
    }

    #[test]
    fn password_length_boundary() {
        assert!(password_validator("").is_some());
        assert!(password_validator("1234").is_some());
        assert!(password_validator("12345").is_none());
    }

    #[test]
    fn name_must_not_be_empty() {
        assert!(name_validator("").is_some());
        assert!(name_validator("Alice").is_none());
    }
}
