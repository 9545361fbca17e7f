//! Resurfacing queue: classify notes by time since last modification.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::index::search::{has_all_tags, satisfies_metadata};
use crate::index::{DocumentIndex, Query};

/// A named age tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub name: String,
    /// Minimum age for a note to land in this bucket.
    #[serde(serialize_with = "serialize_delta")]
    pub after: TimeDelta,
}

impl Bucket {
    pub fn new(name: impl Into<String>, after: TimeDelta) -> Self {
        Self { name: name.into(), after }
    }

    /// daily, every-3-days, weekly, biweekly, monthly.
    pub fn default_ladder() -> Vec<Bucket> {
        vec![
            Bucket::new("daily", TimeDelta::hours(24)),
            Bucket::new("every-3-days", TimeDelta::hours(72)),
            Bucket::new("weekly", TimeDelta::days(7)),
            Bucket::new("biweekly", TimeDelta::days(14)),
            Bucket::new("monthly", TimeDelta::days(30)),
        ]
    }
}

/// Parameters for [`build_resurface_queue`].
#[derive(Debug, Clone)]
pub struct ResurfaceOptions {
    pub now: DateTime<Utc>,
    /// Notes younger than this are never queued.
    pub minimum_age: TimeDelta,
    /// Maximum queue length; zero means unlimited.
    pub limit: usize,
    /// Bucket ladder; empty selects [`Bucket::default_ladder`].
    pub buckets: Vec<Bucket>,
    /// Pre-filter applied before classification.
    pub query: Query,
}

impl Default for ResurfaceOptions {
    fn default() -> Self {
        Self {
            now: Utc::now(),
            minimum_age: TimeDelta::zero(),
            limit: 0,
            buckets: Vec::new(),
            query: Query::default(),
        }
    }
}

/// A note due for review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResurfaceItem {
    pub path: PathBuf,
    pub title: String,
    pub tags: Vec<String>,
    pub metadata: BTreeMap<String, Vec<String>>,
    pub links: Vec<String>,
    pub modified_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_delta")]
    pub age: TimeDelta,
    pub bucket: String,
}

/// Classify every matching document into the largest bucket its age reaches
/// and order the result stalest tier first, oldest first within a tier.
pub fn build_resurface_queue(
    index: &DocumentIndex,
    options: &ResurfaceOptions,
) -> Vec<ResurfaceItem> {
    let mut buckets = if options.buckets.is_empty() {
        Bucket::default_ladder()
    } else {
        options.buckets.clone()
    };
    buckets.sort_by_key(|b| b.after);

    let mut ranked: Vec<(usize, ResurfaceItem)> = index
        .matching(&options.query)
        .into_iter()
        .filter_map(|doc| {
            let age = options.now - doc.modified;
            if age < options.minimum_age {
                return None;
            }
            let rank = classify(&buckets, age)?;
            Some((
                rank,
                ResurfaceItem {
                    path: doc.path.clone(),
                    title: doc.title.clone(),
                    tags: doc.tags.clone(),
                    metadata: doc.front_matter.clone(),
                    links: doc.links.clone(),
                    modified_at: doc.modified,
                    age,
                    bucket: buckets[rank].name.clone(),
                },
            ))
        })
        .collect();

    ranked.sort_by(|(rank_a, a), (rank_b, b)| {
        rank_b
            .cmp(rank_a)
            .then_with(|| a.modified_at.cmp(&b.modified_at))
            .then_with(|| a.path.cmp(&b.path))
    });

    let mut items: Vec<ResurfaceItem> = ranked.into_iter().map(|(_, item)| item).collect();
    if options.limit > 0 {
        items.truncate(options.limit);
    }
    items
}

/// Index of the last bucket (ascending thresholds) whose threshold the age
/// reaches.
fn classify(buckets: &[Bucket], age: TimeDelta) -> Option<usize> {
    let mut best = None;
    for (rank, bucket) in buckets.iter().enumerate() {
        if age >= bucket.after {
            best = Some(rank);
        }
    }
    best
}

/// Keep items carrying every tag and every metadata value requested.
pub fn filter_queue(
    items: Vec<ResurfaceItem>,
    tags: &[String],
    metadata: &BTreeMap<String, Vec<String>>,
) -> Vec<ResurfaceItem> {
    if tags.is_empty() && metadata.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| {
            has_all_tags(&item.tags, tags) && satisfies_metadata(&item.metadata, metadata)
        })
        .collect()
}

fn serialize_delta<S: serde::Serializer>(delta: &TimeDelta, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(delta.num_seconds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexConfig;
    use std::fs::{self, File};
    use std::path::Path;
    use std::time::SystemTime;
    use tempfile::TempDir;

    fn write_aged(root: &Path, name: &str, content: &str, now: DateTime<Utc>, age: TimeDelta) {
        let path = root.join(name);
        fs::write(&path, content).unwrap();
        let modified: SystemTime = (now - age).into();
        File::options().write(true).open(&path).unwrap().set_modified(modified).unwrap();
    }

    fn index_of(root: &Path) -> DocumentIndex {
        let files = crate::vault::VaultWalker::new(root).unwrap().walk().unwrap();
        let mut index = DocumentIndex::new(root, IndexConfig::default());
        index.build(files.iter().map(|f| &f.absolute_path)).unwrap();
        index
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn names(items: &[ResurfaceItem]) -> Vec<String> {
        items.iter().map(|i| i.path.file_name().unwrap().to_string_lossy().to_string()).collect()
    }

    #[test]
    fn test_queue_orders_stalest_tier_first() {
        let dir = TempDir::new().unwrap();
        let now = fixed_now();
        write_aged(dir.path(), "ten-days.md", "# Ten", now, TimeDelta::days(10));
        write_aged(dir.path(), "four-days.md", "# Four", now, TimeDelta::days(4));
        write_aged(dir.path(), "six-hours.md", "# Six", now, TimeDelta::hours(6));

        let options = ResurfaceOptions {
            now,
            buckets: vec![
                Bucket::new("weekly", TimeDelta::days(7)),
                Bucket::new("daily", TimeDelta::hours(24)),
            ],
            ..Default::default()
        };
        let queue = build_resurface_queue(&index_of(dir.path()), &options);

        assert_eq!(names(&queue), vec!["ten-days.md", "four-days.md"]);
        assert_eq!(queue[0].bucket, "weekly");
        assert_eq!(queue[1].bucket, "daily");
        assert_eq!(queue[0].age, TimeDelta::days(10));
    }

    #[test]
    fn test_default_ladder_and_ties() {
        let dir = TempDir::new().unwrap();
        let now = fixed_now();
        write_aged(dir.path(), "b.md", "# B", now, TimeDelta::days(40));
        write_aged(dir.path(), "a.md", "# A", now, TimeDelta::days(40));
        write_aged(dir.path(), "c.md", "# C", now, TimeDelta::days(50));
        write_aged(dir.path(), "d.md", "# D", now, TimeDelta::hours(72));

        let options = ResurfaceOptions { now, ..Default::default() };
        let queue = build_resurface_queue(&index_of(dir.path()), &options);

        assert_eq!(names(&queue), vec!["c.md", "a.md", "b.md", "d.md"]);
        assert_eq!(queue[0].bucket, "monthly");
        // An age equal to a threshold lands in that bucket.
        assert_eq!(queue[3].bucket, "every-3-days");
    }

    #[test]
    fn test_minimum_age_limit_and_query() {
        let dir = TempDir::new().unwrap();
        let now = fixed_now();
        write_aged(dir.path(), "old.md", "---\ntags: [keep]\n---\n", now, TimeDelta::days(20));
        write_aged(dir.path(), "older.md", "---\ntags: [keep]\n---\n", now, TimeDelta::days(25));
        write_aged(dir.path(), "mid.md", "---\ntags: [keep]\n---\n", now, TimeDelta::days(2));
        write_aged(dir.path(), "other.md", "# Other", now, TimeDelta::days(30));
        let index = index_of(dir.path());

        let options = ResurfaceOptions {
            now,
            minimum_age: TimeDelta::days(3),
            query: Query::default().with_tag("keep"),
            ..Default::default()
        };
        assert_eq!(names(&build_resurface_queue(&index, &options)), vec!["older.md", "old.md"]);

        let limited = ResurfaceOptions { limit: 1, ..options };
        assert_eq!(names(&build_resurface_queue(&index, &limited)), vec!["older.md"]);
    }

    #[test]
    fn test_classification_is_monotonic() {
        let ladder = Bucket::default_ladder();
        let ages: Vec<TimeDelta> = (0..24 * 40).map(TimeDelta::hours).collect();

        for pair in ages.windows(2) {
            let younger = classify(&ladder, pair[0]).map(|r| ladder[r].after);
            let older = classify(&ladder, pair[1]).map(|r| ladder[r].after);
            assert!(younger <= older, "{:?} vs {:?}", pair[0], pair[1]);
        }
        assert_eq!(classify(&ladder, TimeDelta::hours(23)), None);
        assert_eq!(classify(&ladder, TimeDelta::hours(24)), Some(0));
    }

    fn item(name: &str, tags: &[&str], status: Option<&str>) -> ResurfaceItem {
        let mut metadata = BTreeMap::new();
        if let Some(status) = status {
            metadata.insert("status".to_string(), vec![status.to_string()]);
        }
        ResurfaceItem {
            path: PathBuf::from(name),
            title: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            metadata,
            links: Vec::new(),
            modified_at: fixed_now(),
            age: TimeDelta::zero(),
            bucket: "daily".to_string(),
        }
    }

    #[test]
    fn test_filter_queue() {
        let items = vec![
            item("a.md", &["project"], Some("active")),
            item("b.md", &["project"], Some("paused")),
        ];
        let mut metadata = BTreeMap::new();
        metadata.insert("status".to_string(), vec!["Active".to_string()]);

        let kept = filter_queue(items.clone(), &["Project".to_string()], &metadata);
        assert_eq!(names(&kept), vec!["a.md"]);

        assert_eq!(filter_queue(items.clone(), &[], &BTreeMap::new()), items);
    }
}
