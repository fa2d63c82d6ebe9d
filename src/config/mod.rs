use crate::error::Result;
use clap::Parser;
use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::info;

pub(crate) mod cli;

pub use cli::{Args, Command};

/// Outbound transport for upstream calls, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    Socks(String),
    Http(String),
    Direct,
}

impl Transport {
    /// A SOCKS proxy wins over HTTP(S) proxies, which win over a direct
    /// connection. Empty values count as unset.
    pub fn pick(socks: Option<&str>, http: Option<&str>) -> Self {
        match (socks, http) {
            (Some(addr), _) if !addr.is_empty() => Transport::Socks(addr.to_string()),
            (_, Some(url)) if !url.is_empty() => Transport::Http(url.to_string()),
            _ => Transport::Direct,
        }
    }
}

pub struct Config {
    pub args: Args,
    pub transport: Transport,
    pub http_client: Client,
}

impl Config {
    pub fn new() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let transport = Transport::pick(
            args.socks_proxy.as_deref(),
            args.http_proxy.as_deref().or(args.https_proxy.as_deref()),
        );
        let http_client = build_client(&transport)?;

        Ok(Self {
            args,
            transport,
            http_client,
        })
    }
}

fn build_client(transport: &Transport) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36");

    match transport {
        Transport::Socks(addr) => {
            info!("Routing outbound calls through SOCKS5 proxy {}", addr);
            // socks5h so hostnames resolve on the proxy side
            let url = if addr.contains("://") {
                addr.clone()
            } else {
                format!("socks5h://{}", addr)
            };
            builder = builder.proxy(Proxy::all(url)?);
        }
        Transport::Http(url) => {
            info!("Routing outbound calls through HTTP proxy {}", url);
            builder = builder.proxy(Proxy::all(url)?);
        }
        Transport::Direct => {
            info!("No proxy configured, using a direct connection");
        }
    }

    Ok(builder.build()?)
}
