//! AWS Bedrock Runtime provider.

mod client;

pub use client::BedrockClient;
