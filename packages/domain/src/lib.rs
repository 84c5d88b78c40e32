//! # VitalSync ドメイン層
//!
//! 上流フィットネスサービスのデータを正規化した「日次ヘルスレポート」と、
//! それを組み立てるための値オブジェクト・ルールを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! bff → infra → domain
//! ```
//!
//! ドメイン層は HTTP や上流サービスの通信に一切依存しない。
//! 上流のレスポンス形式（DTO）は infra 層が持ち、ここでは正規化後の形だけを扱う。
//!
//! ## モジュール構成
//!
//! - [`activity_type`] - アクティビティ種別の表示用整形
//! - [`clock`] - 時刻プロバイダ
//! - [`credentials`] - 上流サービスの認証情報
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`feed`] - フィードごとの取得結果
//! - [`report`] - 正規化済みの日次レポート
//! - [`report_date`] - 対象日・睡眠日の決定
//! - [`vo2_max`] - VO2max の区分判定

pub mod activity_type;
pub mod clock;
pub mod credentials;
pub mod error;
pub mod feed;
pub mod report;
pub mod report_date;
pub mod vo2_max;

pub use error::DomainError;
