//! Folder/slug ids and detail-page links.

use crate::config::LinkConfig;
use crate::person::Person;
use regex::Regex;
use std::sync::OnceLock;

fn non_word_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("static regex"))
}

/// `id{PersonID}_{name}` with the name lowercased and every run of non-word characters collapsed
/// to `_`. Safe as a directory name and as a URL path segment.
pub fn folder_id(person: &Person) -> String {
    let name = person
        .name
        .as_deref()
        .map(|n| {
            non_word_runs()
                .replace_all(&n.to_lowercase(), "_")
                .into_owned()
        })
        .unwrap_or_default();
    format!("id{}_{}", person.id, name)
}

/// Base path for detail pages: the repository prefix on the hosted site, `.` otherwise.
pub fn detail_base_path(links: &LinkConfig) -> String {
    let hosted = !links.host.is_empty()
        && !links.hosted_pattern.is_empty()
        && links.host.contains(&links.hosted_pattern);
    if hosted {
        format!("/{}", links.repo_name.trim_matches('/'))
    } else {
        ".".to_string()
    }
}

pub fn detail_url(person: &Person, links: &LinkConfig) -> String {
    let key = if links.use_slug {
        folder_id(person)
    } else {
        person.id.to_string()
    };
    let encoded: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
    format!("{}/person.html?id={}", detail_base_path(links), encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(id: &str, name: &str) -> Person {
        let mut p = Person::new(id, 1);
        p.name = Some(name.to_string());
        p
    }

    #[test]
    fn folder_id_collapses_non_word_runs() {
        assert_eq!(folder_id(&named("7", "Anna  Maria-Smith")), "id7_anna_maria_smith");
        assert_eq!(folder_id(&Person::new("3", 1)), "id3_");
    }

    #[test]
    fn links_switch_base_on_hosted_pattern() {
        let p = named("12", "Ivan");
        let mut links = LinkConfig::default();
        assert_eq!(detail_url(&p, &links), "./person.html?id=12");

        links.host = "someone.github.io".to_string();
        assert_eq!(detail_url(&p, &links), "/family-tree_v2/person.html?id=12");

        links.use_slug = true;
        assert_eq!(detail_url(&p, &links), "/family-tree_v2/person.html?id=id12_ivan");
    }
}
