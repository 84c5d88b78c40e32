//! # VitalSync BFF ライブラリ
//!
//! モバイルクライアント向けのヘルスデータ集約 API のコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: State の組み立てとルーター構築
//! - `client`: 上流サービスの HTTP クライアント
//! - `config`: 環境変数からの設定読み込み
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（Request ID、キャッシュ制御）
//! - `usecase`: フィードの並行取得と正規化

pub mod app_builder;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
