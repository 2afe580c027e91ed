use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

#[cfg(feature = "tch-backend")]
use tch::Device;

pub const DEFAULT_MODEL_ID: &str = "TinyLlama/TinyLlama-1.1B-Chat-v1.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub model_id: String,
    pub module_path: PathBuf,
    pub tokenizer_path: PathBuf,
    pub eos_token: String,
    /// Prompts longer than this many chars are rejected. `None` means no limit.
    pub max_prompt_chars: Option<usize>,
    #[cfg(feature = "tch-backend")]
    pub device: Device,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup("SERVER_ADDR")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT));

        let model_id = lookup("MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());

        let module_path = PathBuf::from(
            lookup("MODEL_MODULE_PATH").unwrap_or_else(|| "models/tinyllama_chat.ts".to_string()),
        );
        let tokenizer_path = PathBuf::from(
            lookup("TOKENIZER_PATH").unwrap_or_else(|| "models/tokenizer.json".to_string()),
        );
        let eos_token = lookup("EOS_TOKEN").unwrap_or_else(|| "</s>".to_string());

        let max_prompt_chars = match lookup("MAX_PROMPT_CHARS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(limit) if limit > 0 => Some(limit),
                _ => anyhow::bail!("MAX_PROMPT_CHARS must be a positive integer, got {raw:?}"),
            },
            None => None,
        };

        #[cfg(feature = "tch-backend")]
        let device = {
            let raw = lookup("DEVICE").unwrap_or_else(|| "cpu".into());
            parse_device(&raw)
        };

        Ok(Self {
            listen_addr,
            model_id,
            module_path,
            tokenizer_path,
            eos_token,
            max_prompt_chars,
            #[cfg(feature = "tch-backend")]
            device,
        })
    }
}

#[cfg(feature = "tch-backend")]
fn parse_device(raw: &str) -> Device {
    let lower = raw.to_lowercase();
    if lower.starts_with("cuda") {
        let idx = lower
            .split(':')
            .nth(1)
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(0);
        if tch::Cuda::is_available() {
            Device::Cuda(idx)
        } else {
            tracing::warn!(requested = %raw, "CUDA unavailable, falling back to CPU");
            Device::Cpu
        }
    } else {
        Device::Cpu
    }
}
