//! Query keys for every cached view, and the prefixes mutations invalidate.

use crate::cache::QueryKey;

pub fn patients(page: u32, name: &str) -> QueryKey {
    all_patients().with(page).with(name)
}

pub fn all_patients() -> QueryKey {
    QueryKey::new("patients")
}

pub fn patient(id: &str) -> QueryKey {
    QueryKey::new("patient").with(id)
}

pub fn doctors(page: u32, name: &str) -> QueryKey {
    all_doctors().with(page).with(name)
}

pub fn all_doctors() -> QueryKey {
    QueryKey::new("alldrs")
}

pub fn doctor(id: &str) -> QueryKey {
    QueryKey::new("dr").with(id)
}

pub fn requests(page: u32) -> QueryKey {
    all_requests().with(page)
}

pub fn all_requests() -> QueryKey {
    QueryKey::new("requests")
}

pub fn dashboard(page: u32) -> QueryKey {
    QueryKey::new("dashboard").with(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_component_is_part_of_the_key() {
        assert_ne!(patients(1, ""), patients(2, ""));
        assert_ne!(patients(1, ""), patients(1, "ali"));
        assert_ne!(patient("p1"), patient("p2"));
        assert!(patients(3, "ali").starts_with(&all_patients()));
        assert!(doctors(1, "").starts_with(&all_doctors()));
        assert!(!doctor("d1").starts_with(&all_doctors()));
        assert!(requests(2).starts_with(&all_requests()));
    }
}
