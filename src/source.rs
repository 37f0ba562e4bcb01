//! ソース管理モジュール
//!
//! 式のソーステキストを codespan に登録し、行単位の検査と
//! 診断情報の出力を行う。

use crate::error::{ErrorCollector, MacroError, MacroResult};
use crate::lexer::{tokenize_with, Mode};
use codespan_reporting::diagnostic::Diagnostic;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use std::fs;
use std::path::Path;

/// 診断用に登録されたソーステキスト
pub struct SourceState {
    pub name: String,
    pub source: String,
    pub files: SimpleFiles<String, String>,
    pub file_id: usize,
}

/// 行単位検査の結果
#[derive(Debug, Default)]
pub struct CheckReport {
    /// 空行を除いた検査済みの式の数
    pub checked: usize,
    pub errors: ErrorCollector,
}

impl SourceState {
    /// 文字列からソース状態を作成
    pub fn new(name: impl Into<String>, source: String) -> Self {
        let name = name.into();
        let mut files = SimpleFiles::new();
        let file_id = files.add(name.clone(), source.clone());
        Self {
            name,
            source,
            files,
            file_id,
        }
    }

    /// ファイルを読み込んでソース状態を作成
    pub fn from_file<P: AsRef<Path>>(path: P) -> MacroResult<Self> {
        let source = fs::read_to_string(path.as_ref())?;
        Ok(Self::new(path.as_ref().display().to_string(), source))
    }

    /// 各行を一つの式として厳格モードで検査する
    ///
    /// エラーの `base` には行頭のバイトオフセットが入るので、
    /// 診断のラベルはファイル全体の中の位置を指す。
    pub fn check_lines(&self) -> CheckReport {
        let mut report = CheckReport::default();

        let mut base = 0;
        for line in self.source.split_inclusive('\n') {
            let expression = line.trim_end_matches(['\n', '\r']);
            if !expression.trim().is_empty() {
                report.checked += 1;
                if let Err(e) = tokenize_with(expression, Mode::Strict) {
                    log::debug!("{} at byte {}: {}", self.name, base, e);
                    report.errors.add_error(e.into(), self.file_id, base);
                }
            }
            base += line.len();
        }

        report
    }

    /// 診断情報を標準エラーに出力
    pub fn report_error(&self, diagnostic: &Diagnostic<usize>) -> MacroResult<()> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();
        let result = codespan_reporting::term::emit(&mut writer.lock(), &config, &self.files, diagnostic)
            .map_err(|e| MacroError::Io(format!("診断情報の出力に失敗: {}", e)));
        result
    }

    /// 収集したすべてのエラーを出力
    pub fn report_errors(&self, errors: &ErrorCollector) -> MacroResult<()> {
        for error in errors.errors() {
            self.report_error(&error.to_diagnostic())?;
        }
        Ok(())
    }
}
