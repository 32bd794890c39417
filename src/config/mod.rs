// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Every option can be given as a flag or through the environment. A `.env`
//! file in the working directory is loaded before parsing.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::api::http_server::DEFAULT_MAX_UPLOAD_BYTES;
use crate::classifier::ClassifierConfig;
use crate::vision::DetectorKind;

/// Star Classifier service
#[derive(Parser, Debug, Clone)]
#[command(name = "star-classifier")]
#[command(version)]
#[command(about = "HTTP service that classifies star images", long_about = None)]
pub struct ServiceConfig {
    /// Interface to bind
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 10000)]
    pub port: u16,

    /// Path to the ONNX classifier artifact
    #[arg(long, env = "MODEL_PATH", default_value = "star_model.onnx")]
    pub model_path: PathBuf,

    /// Optional file with one class name per line
    #[arg(long, env = "CLASS_NAMES_PATH")]
    pub class_names_path: Option<PathBuf>,

    /// Star annotation strategy
    #[arg(long, env = "STAR_DETECTOR", value_enum, default_value_t = DetectorKind::Static)]
    pub detector: DetectorKind,

    /// Maximum request body size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Verbose logging
    #[arg(long, env = "DEBUG")]
    pub debug: bool,
}

impl ServiceConfig {
    /// Load `.env` if present, then parse flags and environment
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::parse()
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            model_path: self.model_path.clone(),
            class_names_path: self.class_names_path.clone(),
        }
    }

    /// Default tracing filter when RUST_LOG is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "star_classifier=debug,tower_http=debug,info"
        } else {
            "info"
        }
    }
}
