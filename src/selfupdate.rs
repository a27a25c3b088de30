//! `mypctools update`: replace the running binary with the latest release and
//! fast-forward the scripts checkout.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use reqwest::Client;
use sha2::{Digest, Sha256};

use crate::git;
use crate::ui;

const RELEASE_BASE_URL: &str = "https://github.com/reisset/mypctools/releases/latest/download";

/// Release asset suffix for this machine.
fn release_arch() -> Result<&'static str> {
    match std::env::consts::ARCH {
        "x86_64" => Ok("amd64"),
        "aarch64" => Ok("arm64"),
        other => bail!("No release build for {}", other),
    }
}

pub fn asset_name(arch: &str) -> String {
    format!("mypctools-linux-{}", arch)
}

/// Find `file`'s hash in a `sha256sum`-style listing (`<hash>  <name>`).
pub fn parse_checksums(listing: &str, file: &str) -> Option<String> {
    listing.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        let hash = fields.next()?;
        // sha256sum marks binary mode with a leading '*'
        let name = fields.next()?.trim_start_matches('*');
        (fields.next().is_none() && name == file).then(|| hash.to_lowercase())
    })
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

async fn download(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        bail!("Download failed: HTTP {} for {}", response.status().as_u16(), url);
    }

    let bytes = response
        .bytes()
        .await
        .with_context(|| format!("Failed to read {}", url))?;
    Ok(bytes.to_vec())
}

async fn expected_checksum(client: &Client, name: &str) -> Result<String> {
    let url = format!("{}/checksums.txt", RELEASE_BASE_URL);
    let listing = download(client, &url).await?;
    parse_checksums(&String::from_utf8_lossy(&listing), name)
        .with_context(|| format!("No checksum listed for {}", name))
}

/// Write `bytes` next to `dest`, make it executable and rename it over
/// `dest`. The temp file is removed if any step fails.
pub fn replace_executable(dest: &Path, bytes: &[u8]) -> Result<()> {
    let dir = dest
        .parent()
        .context("Executable path has no parent directory")?;
    let tmp: PathBuf = dir.join(format!(".mypctools-update-{}", std::process::id()));

    let result: Result<()> = (|| {
        fs::write(&tmp, bytes).context("Failed to write temp file")?;
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o755))
            .context("Failed to set permissions")?;
        fs::rename(&tmp, dest).context("Failed to replace binary")?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

async fn update_binary(client: &Client) -> Result<()> {
    let exe = std::env::current_exe().context("Failed to get executable path")?;
    let exe = fs::canonicalize(&exe).context("Failed to resolve executable path")?;

    let arch = release_arch()?;
    let name = asset_name(arch);
    let url = format!("{}/{}", RELEASE_BASE_URL, name);

    let bytes = ui::with_spinner(
        &format!("Downloading latest binary ({})...", arch),
        "Binary downloaded",
        || download(client, &url),
    )
    .await?;

    let actual = sha256_hex(&bytes);
    match expected_checksum(client, &name).await {
        Ok(expected) if expected == actual => ui::print_success("Checksum verified."),
        Ok(expected) => bail!("Checksum mismatch: expected {}, got {}", expected, actual),
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "checksum verification skipped");
            ui::print_warn(&format!("Checksum verification skipped ({:#})", e));
        }
    }

    replace_executable(&exe, &bytes)?;
    ui::print_detail("Installed", &exe.display().to_string());
    Ok(())
}

/// Drive `fut` on a one-off runtime. Only called from plain `main`, never
/// from inside another runtime.
fn block_on<F, T>(fut: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;
    rt.block_on(fut)
}

/// Blocking entrypoint for `mypctools update`.
pub fn run_blocking(root_dir: &Path) -> Result<()> {
    block_on(run(root_dir))
}

/// Download and install the latest binary, then pull the scripts.
pub async fn run(root_dir: &Path) -> Result<()> {
    tracing::info!(root = %root_dir.display(), "self-update started");
    let client = Client::builder()
        .user_agent(concat!("mypctools/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    update_binary(&client).await.context("Failed to update binary")?;
    ui::print_success("Binary updated.");

    ui::print_info("Pulling latest scripts...");
    git::pull_ff_only(root_dir).context("Failed to pull scripts")?;
    ui::print_success("Scripts updated.");

    tracing::info!("self-update finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
3a7bd3e2360a3d29eea436fcfb7e44c735d117c42d1c1835420b6b9942dd4f1b  mypctools-linux-amd64
B94D27B9934D3E08A52E52D7DA7DABFAC484EFE37A5380EE9088F7ACE2EFCDE9 *mypctools-linux-arm64
";

    #[test]
    fn finds_checksum_for_asset() {
        assert_eq!(
            parse_checksums(LISTING, "mypctools-linux-amd64").as_deref(),
            Some("3a7bd3e2360a3d29eea436fcfb7e44c735d117c42d1c1835420b6b9942dd4f1b")
        );
        assert_eq!(
            parse_checksums(LISTING, "mypctools-linux-arm64").as_deref(),
            Some("b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9")
        );
        assert!(parse_checksums(LISTING, "mypctools-linux-riscv64").is_none());
        assert!(parse_checksums("garbage", "garbage").is_none());
    }

    #[test]
    fn block_on_runs_a_future_to_completion() {
        assert_eq!(block_on(async { Ok(41 + 1) }).unwrap(), 42);
        let err = block_on(async { Err::<(), _>(anyhow::anyhow!("offline")) }).unwrap_err();
        assert_eq!(err.to_string(), "offline");
    }

    #[test]
    fn sha256_matches_known_digest() {
        assert_eq!(
            sha256_hex(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn replaces_file_and_marks_it_executable() {
        let dir = std::env::temp_dir().join(format!("mypctools-selfupdate-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let dest = dir.join("mypctools");
        fs::write(&dest, b"old").unwrap();

        replace_executable(&dest, b"new").unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"new");
        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

        fs::remove_dir_all(&dir).unwrap();
    }
}
