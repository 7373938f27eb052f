//! # メール
//!
//! 送信依頼（[`MailRequest`]）と、検証・合成後にトランスポートへ渡す
//! [`MailEnvelope`] を定義する。
//!
//! ## 設計方針
//!
//! - **検証済みアドレス**: [`MailAddress`] は生成時に形式を検証する。
//!   `MailEnvelope` は `MailAddress` しか受け付けないため、未検証の宛先が
//!   トランスポートに届くことはない
//! - **単一宛先**: 1 リクエスト = 1 宛先 = 1 メッセージ

use derive_more::Display;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::MailError;

/// RFC 5321 におけるアドレス全体の最大長
const MAX_ADDRESS_LENGTH: usize = 254;

/// メールアドレス（値オブジェクト）
///
/// RFC 5322 に準拠した `local@domain` 形式を要求する。
/// 生成時にバリデーションを実行し、不正な値の作成を防ぐ。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(transparent)]
pub struct MailAddress(String);

impl MailAddress {
    /// メールアドレスを検証して作成する
    ///
    /// # バリデーション
    ///
    /// - `validator` クレートのメールアドレス検証（ローカル部・ドメイン部の構文）
    /// - ローカル部はドット区切り（先頭・末尾の `.` と連続する `..` を拒否）
    /// - 最大 254 文字
    ///
    /// # エラー
    ///
    /// 形式が不正な場合は `MailError::InvalidAddress` を返す。
    pub fn new(value: impl Into<String>) -> Result<Self, MailError> {
        let value: String = value.into();

        if value.len() > MAX_ADDRESS_LENGTH || !value.validate_email() {
            return Err(MailError::InvalidAddress(value));
        }

        // validator はローカル部のドットの位置を見ない
        let Some((local, _domain)) = value.rsplit_once('@') else {
            return Err(MailError::InvalidAddress(value));
        };
        if !is_dot_atom(local) {
            return Err(MailError::InvalidAddress(value));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 所有権を持つ文字列に変換する
    pub fn into_string(self) -> String {
        self.0
    }
}

/// 引用符付きでないローカル部が空のアトムを含まないか
fn is_dot_atom(local: &str) -> bool {
    local.starts_with('"') || local.split('.').all(|atom| !atom.is_empty())
}

/// 送信依頼
///
/// 呼び出し元が作成し、`send_mail` に値で渡す。呼び出し完了後に破棄される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailRequest {
    /// 宛先メールアドレス（未検証）
    pub to:      String,
    /// 件名（プレフィックス付与前）
    pub subject: String,
    /// 本文（署名付与前）
    pub message: String,
}

impl MailRequest {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            to:      to.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// 送信直前のメール
///
/// 宛先は検証済み、件名はプレフィックス付与済み、本文は署名付与済み。
/// 3 つのトランスポートはいずれもこの形でメールを受け取る。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailEnvelope {
    /// 検証済みの宛先
    pub to:      MailAddress,
    /// プレフィックス付きの件名
    pub subject: String,
    /// 署名付きの本文
    pub body:    String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a@b.com")]
    #[case("user@example.com")]
    #[case("first.last+tag@sub.example.co.jp")]
    #[case("user_name-1@example-host.org")]
    fn test_正常な形式のアドレスを受け入れる(#[case] input: &str) {
        let address = MailAddress::new(input).unwrap();
        assert_eq!(address.as_str(), input);
    }

    #[rstest]
    #[case("", "空文字列")]
    #[case("not-an-email", "@記号なし")]
    #[case("@", "@のみ")]
    #[case("@example.com", "ローカル部分が空")]
    #[case("user@", "ドメイン部分が空")]
    #[case("user@exa mple.com", "ドメインに空白")]
    #[case("user@-example.com", "ドメインがハイフン始まり")]
    #[case("user@.com", "ドメインのラベルが空")]
    #[case(&format!("{}@example.com", "a".repeat(250)), "254文字超過")]
    #[case(".a@example.com", "ローカル部分がドット始まり")]
    #[case("a.@example.com", "ローカル部分がドット終わり")]
    #[case("a..b@example.com", "ローカル部分にドットの連続")]
    fn test_不正な形式のアドレスはinvalid_addressになる(
        #[case] input: &str,
        #[case] _reason: &str,
    ) {
        let err = MailAddress::new(input).unwrap_err();
        assert!(matches!(err, MailError::InvalidAddress(ref v) if v == input));
    }

    #[test]
    fn test_displayは元の文字列を出力する() {
        let address = MailAddress::new("user@example.com").unwrap();
        assert_eq!(address.to_string(), "user@example.com");
    }

    #[test]
    fn test_mail_requestは各フィールドを保持する() {
        let request = MailRequest::new("a@b.com", "Hi", "Body");

        assert_eq!(request.to, "a@b.com");
        assert_eq!(request.subject, "Hi");
        assert_eq!(request.message, "Body");
    }
}
