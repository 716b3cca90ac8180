use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;

use crate::{ContentsError, Result};

/// Mirror root the contents index is fetched from by default.
pub const DEFAULT_MIRROR: &str = "http://ftp.uk.debian.org/debian/dists/stable/main/";

const USER_AGENT: &str = "package-statistics/0.1.0";

/// Builds the index URL for an architecture under a mirror root.
pub fn contents_url(mirror: &str, arch: &str) -> String {
    let separator = if mirror.ends_with('/') { "" } else { "/" };
    format!("{mirror}{separator}Contents-{arch}.gz")
}

/// Downloads `Contents-<arch>.gz` into `dest_dir` and returns the path of
/// the downloaded archive. Download progress is drawn on stderr; stdout
/// stays reserved for the report.
pub async fn download_contents(mirror: &str, arch: &str, dest_dir: &Path) -> Result<PathBuf> {
    let url = contents_url(mirror, arch);
    let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

    log::info!("fetching {url}");
    let mut response = client.get(&url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
        return Err(ContentsError::NotFound { url });
    }
    if !response.status().is_success() {
        return Err(ContentsError::UnexpectedStatus {
            status: response.status().as_u16(),
            url,
        });
    }

    let file_name = format!("Contents-{arch}.gz");
    let dest = dest_dir.join(&file_name);
    let mut file = File::create(&dest)?;

    // A missing Content-Length leaves the total at zero.
    let bar = ProgressBar::new(response.content_length().unwrap_or(0));
    bar.set_style(
        ProgressStyle::with_template("{msg} {bytes}/{total_bytes} |{wide_bar}| {bytes_per_sec}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message(file_name);

    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk)?;
        bar.inc(chunk.len() as u64);
    }
    file.flush()?;
    bar.finish();

    log::debug!("wrote {}", dest.display());
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn url_joins_mirror_and_architecture() {
        assert_eq!(
            contents_url("http://deb.example.org/dists/stable/main/", "amd64"),
            "http://deb.example.org/dists/stable/main/Contents-amd64.gz"
        );
    }

    #[test]
    fn url_inserts_a_slash_when_the_mirror_lacks_one() {
        assert_eq!(
            contents_url("http://deb.example.org/dists/stable/main", "arm64"),
            "http://deb.example.org/dists/stable/main/Contents-arm64.gz"
        );
    }
}
