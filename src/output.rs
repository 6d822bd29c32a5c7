// src/output.rs
// =============================================================================
// This module receives the finished crawl report and presents it:
// - two plain text files, one normalized URL per line
//     {domain}_in-domain.txt    links on the seed's domain
//     {domain}_third-party.txt  everything else
// - a short summary (or the whole report as JSON) on stdout
// =============================================================================

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::crawl::CrawlReport;

// Writes both link lists into `dir` and returns the two paths
//
// Existing files with the same names are overwritten.
pub fn save_report(report: &CrawlReport, dir: &Path) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let internal_path = dir.join(format!("{}_in-domain.txt", report.seed_domain));
    let external_path = dir.join(format!("{}_third-party.txt", report.seed_domain));

    write_lines(&internal_path, &report.internal)?;
    write_lines(&external_path, &report.external)?;

    Ok((internal_path, external_path))
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut contents = lines.join("\n");
    if !contents.is_empty() {
        contents.push('\n');
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

// Prints the human-readable summary
pub fn print_summary(report: &CrawlReport) {
    println!("[+] Total In-Domain links: {}", report.internal.len());
    println!("[+] Total Third-Party links: {}", report.external.len());
    println!("[+] Total URLs: {}", report.total_links());
    println!("[+] Total Crawled URLs: {}", report.visited);
    println!("[+] Crawling completed in {:.2?}", report.elapsed);
}

// Prints the whole report as pretty JSON
pub fn print_json(report: &CrawlReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    println!("{}", json_output);
    Ok(())
}
