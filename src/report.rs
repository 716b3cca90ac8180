use crate::stats::RankedPackage;
use crate::Result;

/// Renders the ranking as an aligned rank/package/count table.
pub fn render_table(ranked: &[RankedPackage]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Rank\t{:<40}\tCount\n", "Package"));
    out.push_str(&format!("{}\n", "-".repeat(61)));
    for (rank, entry) in ranked.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}.\t{:<40}\t{}\n",
            rank + 1,
            entry.location,
            entry.count
        ));
    }
    out
}

/// Renders the ranking as a JSON array.
pub fn render_json(ranked: &[RankedPackage]) -> Result<String> {
    Ok(serde_json::to_string_pretty(ranked)?)
}
