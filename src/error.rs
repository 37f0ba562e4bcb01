//! 統一的なエラーハンドリングモジュール
//!
//! 字句解析の失敗は、問題の文字オフセットと対象の式を保持する
//! [`LexerError`] として報告される。失敗の種別は [`LexErrorKind`] で区別する。

use codespan_reporting::diagnostic::{Diagnostic, Label};
use std::ops::Range;
use thiserror::Error;

/// kmacro の統一エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MacroError {
    /// レキサーエラー
    #[error(transparent)]
    Lexer(#[from] LexerError),

    /// ファイルI/Oエラー
    #[error("ファイル操作エラー: {0}")]
    Io(String),

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for MacroError {
    fn from(e: std::io::Error) -> Self {
        MacroError::Io(e.to_string())
    }
}

/// 字句解析エラーの種別
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexErrorKind {
    #[error("予期しない文字: '{0}'")]
    UnexpectedCharacter(char),

    #[error("不正な数値リテラル: '{0}'")]
    MalformedNumber(String),

    #[error("未終了の文字列リテラル")]
    UnterminatedString,

    #[error("不正な識別子: '{0}'")]
    InvalidIdentifier(String),
}

/// 字句解析エラー
#[derive(Error, Debug, Clone, PartialEq)]
#[error("字句解析エラー (オフセット {offset}): {kind}")]
pub struct LexerError {
    pub kind: LexErrorKind,
    /// `expression` 内の文字オフセット
    pub offset: usize,
    pub expression: String,
}

impl LexerError {
    pub fn new(kind: LexErrorKind, offset: usize, expression: impl Into<String>) -> Self {
        Self {
            kind,
            offset,
            expression: expression.into(),
        }
    }

    /// 問題の文字の式内におけるバイト範囲
    pub fn byte_span(&self) -> Range<usize> {
        match self.expression.char_indices().nth(self.offset) {
            Some((start, c)) => start..start + c.len_utf8(),
            None => self.expression.len()..self.expression.len(),
        }
    }
}

/// codespan に登録されたファイル上の位置を持つエラー
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: MacroError,
    pub file_id: usize,
    /// ファイル内での式の開始バイトオフセット
    pub base: usize,
}

impl DiagnosticError {
    pub fn new(error: MacroError, file_id: usize, base: usize) -> Self {
        Self {
            error,
            file_id,
            base,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        match &self.error {
            MacroError::Lexer(e) => {
                let span = e.byte_span();
                let label = Label::primary(self.file_id, self.base + span.start..self.base + span.end)
                    .with_message(label_message(&e.kind));
                Diagnostic::error()
                    .with_message(format!("字句解析エラー: {}", e.kind))
                    .with_labels(vec![label])
            }
            MacroError::Io(message) => Diagnostic::error().with_message(format!("ファイル操作エラー: {}", message)),
            MacroError::Other(message) => Diagnostic::error().with_message(message.clone()),
        }
    }
}

fn label_message(kind: &LexErrorKind) -> &'static str {
    match kind {
        LexErrorKind::UnexpectedCharacter(_) => "マクロ式では使用できない文字",
        LexErrorKind::MalformedNumber(_) => "ここから始まる数値",
        LexErrorKind::UnterminatedString => "文字列が閉じられていない",
        LexErrorKind::InvalidIdentifier(_) => "ここから始まる識別子",
    }
}

/// 複数の式にわたるエラーを収集する
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: MacroError, file_id: usize, base: usize) {
        self.errors.push(DiagnosticError::new(error, file_id, base));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }
}

/// Result型のエイリアス
pub type MacroResult<T> = Result<T, MacroError>;
