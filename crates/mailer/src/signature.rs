//! # 署名
//!
//! 本文末尾に付与する連絡先署名の生成を担当する。
//!
//! ## 設計方針
//!
//! - **レンダラーの注入**: テンプレート処理は [`SignatureRenderer`] trait で抽象化し、
//!   [`SignatureComposer`] に外から渡す
//! - **`include_str!` によるコンパイル時埋め込み**: 署名テンプレートはバイナリに埋め込まれる
//! - **区切りを足さない**: 本文と署名の間の改行はテンプレート自身が持つ

use std::sync::Arc;

use lwmailer_domain::{MailError, config::SignatureSettings, contact::ContactInfo};
use tera::{Context, Tera};

const TEMPLATE_NAME: &str = "signature.txt";

/// 署名レンダラー
///
/// 連絡先を受け取り、本文末尾に連結する文字列を返す。
pub trait SignatureRenderer: Send + Sync {
    fn render(&self, contact: &ContactInfo) -> Result<String, MailError>;
}

/// tera による署名レンダラー
///
/// テンプレートからは `organisationName`, `name`, `phone`, `fax` を参照できる。
pub struct TeraSignatureRenderer {
    engine: Tera,
}

impl TeraSignatureRenderer {
    /// `include_str!` で埋め込んだテンプレートを tera に登録する
    pub fn new() -> Result<Self, MailError> {
        let mut engine = Tera::default();

        engine
            .add_raw_template(TEMPLATE_NAME, include_str!("../templates/signature.txt"))
            .map_err(|e| MailError::Template(e.to_string()))?;

        Ok(Self { engine })
    }
}

impl SignatureRenderer for TeraSignatureRenderer {
    fn render(&self, contact: &ContactInfo) -> Result<String, MailError> {
        let context =
            Context::from_serialize(contact).map_err(|e| MailError::Template(e.to_string()))?;

        self.engine
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| MailError::Template(e.to_string()))
    }
}

/// 署名付与
///
/// 署名が無効ならレンダラーを呼ばずに本文をそのまま返す。
#[derive(Clone)]
pub struct SignatureComposer {
    renderer: Arc<dyn SignatureRenderer>,
}

impl SignatureComposer {
    pub fn new(renderer: Arc<dyn SignatureRenderer>) -> Self {
        Self { renderer }
    }

    /// 本文に署名を連結する
    pub fn compose(&self, body: &str, settings: &SignatureSettings) -> Result<String, MailError> {
        if !settings.enabled {
            return Ok(body.to_string());
        }

        let signature = self.renderer.render(&settings.contact)?;
        Ok(format!("{body}{signature}"))
    }
}
