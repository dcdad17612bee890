//! Host-list optimization passes run before trie construction.

use std::collections::HashSet;

pub struct OptimizeStats {
    pub before: usize,
    pub after: usize,
    pub deduped: usize,
    pub shadowed: usize,
}

/// Sort, deduplicate, and (for subdomain-matching snapshots) drop hosts
/// already covered by an ancestor domain entry.
pub fn optimize_hosts(hosts: &mut Vec<String>, match_subdomains: bool) -> OptimizeStats {
    let before = hosts.len();

    hosts.sort();
    hosts.dedup();
    let deduped = before - hosts.len();

    let mut shadowed = 0usize;
    if match_subdomains {
        let keep: HashSet<String> = hosts.iter().cloned().collect();
        hosts.retain(|host| {
            let mut rest = host.as_str();
            while let Some(dot) = rest.find('.') {
                rest = &rest[dot + 1..];
                if keep.contains(rest) {
                    shadowed += 1;
                    return false;
                }
            }
            true
        });
    }

    OptimizeStats {
        before,
        after: hosts.len(),
        deduped,
        shadowed,
    }
}
