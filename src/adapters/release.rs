use crate::utils::error::{EtlError, Result};
use flate2::read::GzDecoder;
use reqwest::Client;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tar::Archive;

const RELEASES_API: &str = "https://api.github.com/repos/SagerNet/sing-box/releases/latest";
const DOWNLOAD_BASE: &str = "https://github.com/SagerNet/sing-box/releases/download";
const USER_AGENT: &str = concat!("srs-etl/", env!("CARGO_PKG_VERSION"));
const API_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    name: String,
    browser_download_url: String,
}

/// GitHub Release 客戶端，負責下載並快取 sing-box 編譯器
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    client: Client,
    api_url: String,
    download_base: String,
}

impl ReleaseClient {
    pub fn new() -> Result<Self> {
        Self::with_endpoints(RELEASES_API.to_string(), DOWNLOAD_BASE.to_string())
    }

    /// 自訂 API 與下載端點（測試用）
    pub fn with_endpoints(api_url: String, download_base: String) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            api_url,
            download_base,
        })
    }

    /// 取得 sing-box 可執行檔路徑，tools_dir 已有快取時直接重用
    pub async fn ensure_compiler(&self, tools_dir: &str) -> Result<PathBuf> {
        let binary_name = if cfg!(windows) { "sing-box.exe" } else { "sing-box" };
        let binary_path = Path::new(tools_dir).join(binary_name);

        if binary_path.exists() {
            tracing::info!("✅ Using cached sing-box binary: {}", binary_path.display());
            return Ok(binary_path);
        }

        tokio::fs::create_dir_all(tools_dir).await?;

        tracing::info!("📥 Fetching latest sing-box release info...");
        let release = self.latest_release().await?;
        tracing::info!("📦 Latest sing-box version: {}", release.tag_name);

        let url = match find_asset(&release.assets) {
            Some(asset) => {
                tracing::info!("📥 Downloading release asset: {}", asset.name);
                asset.browser_download_url.clone()
            }
            None => {
                let url = self.fallback_url(&release.tag_name);
                tracing::warn!(
                    "⚠️ No matching release asset, trying constructed URL: {}",
                    url
                );
                url
            }
        };

        let archive = self.download(&url).await?;
        tracing::info!(
            "📦 Downloaded {:.2} MB, extracting {}...",
            archive.len() as f64 / 1024.0 / 1024.0,
            binary_name
        );

        let binary = extract_binary(&archive, &url, binary_name)?;
        tokio::fs::write(&binary_path, &binary).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&binary_path, std::fs::Permissions::from_mode(0o755))
                .await?;
        }

        tracing::info!("✅ sing-box ready: {}", binary_path.display());
        Ok(binary_path)
    }

    async fn latest_release(&self) -> Result<Release> {
        let release = self
            .client
            .get(&self.api_url)
            .timeout(API_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json::<Release>()
            .await?;
        Ok(release)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EtlError::DownloadError {
                message: format!("GET {} returned {}", url, response.status()),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// 找不到對應 asset 時依命名慣例拼出下載位址，檔名不含 'v' 前綴
    fn fallback_url(&self, tag: &str) -> String {
        let version = tag.strip_prefix('v').unwrap_or(tag);
        format!(
            "{}/{}/sing-box-{}-{}-{}.{}",
            self.download_base,
            tag,
            version,
            os_token(),
            arch_token(),
            archive_ext()
        )
    }
}

fn os_token() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn arch_token() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "arm" => "armv7",
        other => other,
    }
}

fn archive_ext() -> &'static str {
    if cfg!(windows) {
        "zip"
    } else {
        "tar.gz"
    }
}

fn find_asset(assets: &[Asset]) -> Option<&Asset> {
    let os = os_token();
    let arch = arch_token();
    let ext = archive_ext();

    assets.iter().find(|asset| {
        let name = asset.name.to_lowercase();
        name.contains(os) && name.contains(arch) && name.ends_with(ext)
    })
}

fn extract_binary(archive: &[u8], url: &str, binary_name: &str) -> Result<Vec<u8>> {
    if url.ends_with(".zip") {
        extract_from_zip(archive, binary_name)
    } else {
        extract_from_tar_gz(archive, binary_name)
    }
}

fn extract_from_zip(data: &[u8], binary_name: &str) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let matched = Path::new(file.name())
            .file_name()
            .map(|n| n.eq_ignore_ascii_case(binary_name))
            .unwrap_or(false);
        if matched {
            let mut binary = Vec::new();
            file.read_to_end(&mut binary)?;
            return Ok(binary);
        }
    }

    Err(EtlError::DownloadError {
        message: format!("{} not found in downloaded archive", binary_name),
    })
}

fn extract_from_tar_gz(data: &[u8], binary_name: &str) -> Result<Vec<u8>> {
    let mut archive = Archive::new(GzDecoder::new(data));

    for entry in archive.entries()? {
        let mut entry = entry?;
        let matched = entry
            .path()?
            .file_name()
            .map(|n| n.eq_ignore_ascii_case(binary_name))
            .unwrap_or(false);
        if matched {
            let mut binary = Vec::new();
            entry.read_to_end(&mut binary)?;
            return Ok(binary);
        }
    }

    Err(EtlError::DownloadError {
        message: format!("{} not found in downloaded archive", binary_name),
    })
}
