use crate::domain_utils::domain_of;

/// Compare the From domain against the Return-Path domain.
///
/// Returns `true` (mismatch) only when both domains resolve and differ. A
/// missing or unparsable address never counts as a mismatch.
pub fn check_alignment(from_addr: &str, return_path_addr: &str) -> bool {
    let from_domain = domain_of(from_addr);
    let return_path_domain = domain_of(return_path_addr);

    if from_domain.is_empty() || return_path_domain.is_empty() {
        log::debug!("Sender alignment skipped: unresolved domain");
        return false;
    }

    let mismatch = from_domain != return_path_domain;
    if mismatch {
        log::debug!(
            "Sender misalignment: From={} Return-Path={}",
            from_domain,
            return_path_domain
        );
    }
    mismatch
}
