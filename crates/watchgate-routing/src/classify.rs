//! Path classification.
//!
//! Splits a requested path into its geographic prefix (recognized via the
//! directory) and its canonical route template. Classification never fails;
//! paths the table does not know produce a request with no template.

use watchgate_rbac::Directory;
use watchgate_types::{BranchId, ProvinceId};

use crate::table::{self, RouteTemplate};

/// A classified route request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    /// Province segment found at the front of the path, if any.
    pub province: Option<ProvinceId>,
    /// Branch segment following the province, if any.
    pub branch: Option<BranchId>,
    /// Matched template; `None` means the path carries no requirement.
    pub template: Option<&'static RouteTemplate>,
}

/// Classifies a path against the directory and the route table.
///
/// A leading `/{province}` segment is recognized when the directory knows
/// the province; a following `/{branch}` segment is recognized when the
/// branch belongs to that province. The next segment selects the template.
pub fn classify(path: &str, directory: &Directory) -> RouteRequest {
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();

    let mut province = None;
    let mut branch = None;

    if let Some(first) = segments.peek() {
        let candidate = ProvinceId::from(*first);
        if directory.contains_province(&candidate) {
            province = Some(candidate);
            segments.next();

            if let Some(second) = segments.peek() {
                let candidate = BranchId::from(*second);
                if directory.province_of(&candidate) == province.as_ref() {
                    branch = Some(candidate);
                    segments.next();
                }
            }
        }
    }

    let template = segments.next().and_then(table::lookup);

    RouteRequest {
        province,
        branch,
        template,
    }
}
