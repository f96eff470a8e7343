//! PEM 文本封装的编解码。
//!
//! 编码：Base64 后按 64 列换行，再加上 `-----BEGIN <LABEL>-----` / `-----END <LABEL>-----`。
//! 解码：去掉首尾标记行以及所有空白字符后做 Base64 解码，因此也能接受按 76 列换行的输入。

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const LINE_WIDTH: usize = 64;
const BEGIN_PREFIX: &str = "-----BEGIN ";
const END_PREFIX: &str = "-----END ";
const DASHES: &str = "-----";

/// PEM 标签，仅支持公钥与私钥两种。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PemLabel {
    PublicKey,
    PrivateKey,
}

impl PemLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PemLabel::PublicKey => "PUBLIC KEY",
            PemLabel::PrivateKey => "PRIVATE KEY",
        }
    }
}

impl fmt::Display for PemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PemLabel {
    type Err = PemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PUBLIC KEY" => Ok(PemLabel::PublicKey),
            "PRIVATE KEY" => Ok(PemLabel::PrivateKey),
            other => Err(PemError::UnknownLabel(other.to_string())),
        }
    }
}

#[derive(Error, Debug)]
pub enum PemError {
    #[error("missing BEGIN line")]
    MissingHeader,

    #[error("missing END line")]
    MissingFooter,

    #[error("unsupported label: {0}")]
    UnknownLabel(String),

    #[error("BEGIN label `{begin}` does not match END label `{end}`")]
    LabelMismatch { begin: String, end: String },

    #[error("expected label `{expected}`, found `{found}`")]
    UnexpectedLabel { expected: PemLabel, found: PemLabel },

    #[error("invalid Base64 body: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// 将原始字节封装为 PEM 文本。
pub fn encode(label: PemLabel, data: &[u8]) -> String {
    let body = STANDARD.encode(data);
    let label = label.as_str();
    let mut pem = String::with_capacity(body.len() + body.len() / LINE_WIDTH + 2 * label.len() + 32);

    pem.push_str(BEGIN_PREFIX);
    pem.push_str(label);
    pem.push_str(DASHES);
    pem.push('\n');

    // Base64 输出全部是 ASCII，按字节切分不会落在字符中间。
    let mut rest = body.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(LINE_WIDTH));
        pem.push_str(line);
        pem.push('\n');
        rest = tail;
    }

    pem.push_str(END_PREFIX);
    pem.push_str(label);
    pem.push_str(DASHES);
    pem.push('\n');
    pem
}

/// 解析 PEM 文本，返回标签与原始字节。
pub fn decode(pem: &str) -> Result<(PemLabel, Vec<u8>), PemError> {
    let pem = pem.trim();

    let rest = pem.strip_prefix(BEGIN_PREFIX).ok_or(PemError::MissingHeader)?;
    let (begin_label, rest) = rest.split_once(DASHES).ok_or(PemError::MissingHeader)?;

    let end_start = rest.rfind(END_PREFIX).ok_or(PemError::MissingFooter)?;
    let (body, footer) = rest.split_at(end_start);
    let end_label = footer
        .strip_prefix(END_PREFIX)
        .and_then(|f| f.strip_suffix(DASHES))
        .ok_or(PemError::MissingFooter)?;

    if begin_label != end_label {
        return Err(PemError::LabelMismatch {
            begin: begin_label.to_string(),
            end: end_label.to_string(),
        });
    }
    let label = begin_label.parse::<PemLabel>()?;

    let compact: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    let data = STANDARD.decode(compact)?;
    Ok((label, data))
}

/// 解析 PEM 文本，并要求标签与 `expected` 一致。
pub fn decode_expecting(pem: &str, expected: PemLabel) -> Result<Vec<u8>, PemError> {
    let (found, data) = decode(pem)?;
    if found != expected {
        return Err(PemError::UnexpectedLabel { expected, found });
    }
    Ok(data)
}
