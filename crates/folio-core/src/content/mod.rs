//! Static content records (timeline and roadmap JSON).

mod roadmap;
mod timeline;

pub use roadmap::{RoadmapTopic, TopicStatus, parse_roadmap, parse_roadmap_str};
pub use timeline::{TimelineEvent, parse_timeline, parse_timeline_str};

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub suppress_errors: bool,
}

impl ParseOptions {
    /// Strict parsing (the first invalid record is returned as an error).
    pub fn strict() -> Self {
        Self {
            suppress_errors: false,
        }
    }

    /// Lenient parsing: invalid records are logged and skipped.
    pub fn lenient() -> Self {
        Self {
            suppress_errors: true,
        }
    }
}

/// Records that survived parsing, plus the errors for the ones that were skipped (lenient mode
/// only; strict mode fails instead).
#[derive(Debug)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub rejected: Vec<crate::Error>,
}

pub(crate) fn collect_records<R, T>(
    raw: Vec<R>,
    options: ParseOptions,
    mut convert: impl FnMut(R) -> crate::Result<T>,
) -> crate::Result<Parsed<T>> {
    let mut records = Vec::with_capacity(raw.len());
    let mut rejected = Vec::new();
    for item in raw {
        match convert(item) {
            Ok(r) => records.push(r),
            Err(err) if options.suppress_errors => {
                tracing::warn!(error = %err, "skipping invalid content record");
                rejected.push(err);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(Parsed { records, rejected })
}
