//! # エンクレーブ エラー型
//!
//! キーストア・生体認証・署名デコードの失敗を区別する。
//! Orchestratorはこの型を変更せずに呼び出し元へ伝播する。

/// エンクレーブサービスのエラー型。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnclaveError {
    /// 生体認証・ユーザー存在確認の拒否（キャンセル・タイムアウトを含む）
    #[error("ユーザー認証が拒否されました: {0}")]
    AuthenticationDenied(String),
    /// キーストアでの鍵生成に失敗
    #[error("キーストアエラー: {0}")]
    KeystoreError(String),
    /// 公開鍵の導出・エクスポートに失敗
    #[error("公開鍵の取得に失敗: {0}")]
    KeyAccessError(String),
    /// 指定タグの鍵がキーストアに存在しない
    #[error("鍵が見つかりません: tag={0}")]
    KeyNotFound(String),
    /// ハードウェア署名プリミティブの失敗
    #[error("署名に失敗: {0}")]
    SigningError(String),
    /// キーストアが返した署名のDER構造が不正
    #[error("不正な署名データ: {0}")]
    MalformedSignature(String),
}
