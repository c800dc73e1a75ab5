use labsync_core::TenantRecord;

fn record(
    name: &str,
    codes: &[&str],
    repo: Option<(&str, &str)>,
    enabled: bool,
) -> TenantRecord {
    let slug = name.to_lowercase();
    TenantRecord {
        name: name.to_string(),
        facility_codes: codes.iter().map(|c| (*c).to_string()).collect(),
        mail_list: Some(format!("{slug}@example.org, m&e-{slug}@example.org")),
        repo_id: repo.map(|(id, _)| id.to_string()),
        repo_link: repo.map(|(_, link)| link.to_string()),
        enabled,
    }
}

pub fn all() -> Vec<TenantRecord> {
    vec![
        record(
            "Echo",
            &["MPT01", "MPT02"],
            Some(("repo-echo", "https://files.example.org/d/echo")),
            true,
        ),
        record(
            "Ariel",
            &["BEI01"],
            Some(("repo-ariel", "https://files.example.org/d/ariel")),
            true,
        ),
        record(
            "Quiet",
            &["QUIET01"],
            Some(("repo-quiet", "https://files.example.org/d/quiet")),
            true,
        ),
        record(
            "Broken",
            &["FAIL"],
            Some(("repo-broken", "https://files.example.org/d/broken")),
            true,
        ),
        record(
            "Slow",
            &["TIMEOUT"],
            Some(("repo-slow", "https://files.example.org/d/slow")),
            true,
        ),
        record(
            "Dormant",
            &["MPT01"],
            Some(("repo-dormant", "https://files.example.org/d/dormant")),
            false,
        ),
        TenantRecord {
            repo_link: None,
            ..record(
                "Unlinked",
                &["MPT01"],
                Some(("repo-unlinked", "https://files.example.org/d/unlinked")),
                true,
            )
        },
    ]
}
