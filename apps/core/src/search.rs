use crate::model::Resource;

/// Hard cap on results per query; iteration stops as soon as it is hit.
pub const RESULT_CAP: usize = 30;

/// Case-insensitive substring match over name or path, first-match order.
/// No ranking. An empty needle matches nothing rather than everything.
pub fn filter(snapshot: &[Resource], needle: &str) -> Vec<Resource> {
    let needle = needle.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for resource in snapshot {
        if resource.name.to_lowercase().contains(&needle)
            || resource.path.to_lowercase().contains(&needle)
        {
            results.push(resource.clone());
            if results.len() >= RESULT_CAP {
                break;
            }
        }
    }
    results
}
