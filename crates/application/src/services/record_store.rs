use devdns_domain::{DnsRecord, DomainError, DomainName, RecordType};
use rustc_hash::{FxHashMap, FxHashSet};

pub const DEFAULT_MAX_CNAME_HOPS: usize = 8;

/// Immutable index over the static zone.
///
/// Exact owners and wildcard owners are indexed separately; wildcards are
/// keyed by the suffix they cover (`*.dev.local.` is stored under
/// `dev.local.`).
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<DnsRecord>,
    exact: FxHashMap<DomainName, Vec<usize>>,
    wildcards: FxHashMap<DomainName, Vec<usize>>,
    max_cname_hops: usize,
}

impl RecordStore {
    pub fn new(records: Vec<DnsRecord>, max_cname_hops: usize) -> Self {
        let mut exact: FxHashMap<DomainName, Vec<usize>> = FxHashMap::default();
        let mut wildcards: FxHashMap<DomainName, Vec<usize>> = FxHashMap::default();

        for (idx, record) in records.iter().enumerate() {
            match record.name.wildcard_base() {
                Some(base) => wildcards.entry(base).or_default().push(idx),
                None => exact.entry(record.name.clone()).or_default().push(idx),
            }
        }

        Self {
            records,
            exact,
            wildcards,
            max_cname_hops,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), DEFAULT_MAX_CNAME_HOPS)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when the zone owns `name`, directly or through a wildcard.
    pub fn has(&self, name: &DomainName) -> bool {
        self.exact.contains_key(name) || self.closest_wildcard(name).is_some()
    }

    /// Records of `record_type` at `name`, following CNAMEs inside the zone.
    ///
    /// The result lists traversed CNAME records first, in chain order,
    /// followed by the records found at the end of the chain.
    pub fn lookup(
        &self,
        name: &DomainName,
        record_type: RecordType,
    ) -> Result<Vec<DnsRecord>, DomainError> {
        let mut answer = Vec::new();
        let mut visited: FxHashSet<DomainName> = FxHashSet::default();
        let mut current = name.clone();
        let mut hops = 0;

        loop {
            if !visited.insert(current.clone()) {
                return Err(DomainError::ResolutionLoop {
                    name: name.to_string(),
                    hops,
                });
            }

            let at_name = self.records_at(&current);
            if at_name.is_empty() {
                // Chain left the zone.
                return Ok(answer);
            }

            let before = answer.len();
            answer.extend(
                at_name
                    .iter()
                    .filter(|r| record_type == RecordType::ANY || r.record_type() == record_type)
                    .cloned(),
            );
            if answer.len() > before || !record_type.follows_cname() {
                return Ok(answer);
            }

            let Some(cname) = at_name.iter().find(|r| r.record_type() == RecordType::CNAME)
            else {
                return Ok(answer);
            };
            let Some(target) = cname.data.cname_target().cloned() else {
                return Ok(answer);
            };

            if hops >= self.max_cname_hops {
                return Err(DomainError::ResolutionLoop {
                    name: name.to_string(),
                    hops: hops + 1,
                });
            }
            hops += 1;
            answer.push(cname.clone());
            current = target;
        }
    }

    /// Every record owned by `name`; wildcard answers are only used when the
    /// name has no records of its own, and carry `name` as their owner.
    fn records_at(&self, name: &DomainName) -> Vec<DnsRecord> {
        if let Some(indexes) = self.exact.get(name) {
            return indexes.iter().map(|&i| self.records[i].clone()).collect();
        }
        match self.closest_wildcard(name) {
            Some(indexes) => indexes
                .iter()
                .map(|&i| self.records[i].with_owner(name.clone()))
                .collect(),
            None => Vec::new(),
        }
    }

    fn closest_wildcard(&self, name: &DomainName) -> Option<&Vec<usize>> {
        if self.wildcards.is_empty() {
            return None;
        }
        let mut ancestor = name.parent();
        while let Some(suffix) = ancestor {
            if let Some(indexes) = self.wildcards.get(&suffix) {
                return Some(indexes);
            }
            ancestor = suffix.parent();
        }
        None
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::empty()
    }
}
