//! Line-oriented command shell driving a table.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::str::FromStr;

use revboard_table::{
    CellValue, ColumnFilter, EventResult, PaginationMode, SelectionChange, TableEngine,
    TableOptions, TableSettings, ValueKind,
};
use rust_decimal::Decimal;

use crate::dataset::{self, PagedSource, RevenueRow};
use crate::error::CliError;
use crate::view;

pub const HELP: &str = "\
Commands:
  filter [text]           set or clear the text filter
  where <col> <op> <val>  column filter, op is one of = >= <= ~
  unwhere [col]           clear one or all column filters
  sort <col>              cycle sort on a column
  sort+ <col>             cycle sort, keeping other sort keys
  unsort                  clear the sort
  page <n> | next | prev | first | last
  size <n>                rows per page
  hide <col> | show <col> | show all
  select <key> | select page | unselect page | range <key> | clear
  open <key>              activate a row
  reset                   restore the initial view
  help | quit";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Filter(String),
    Where { column: String, op: FilterOp, value: String },
    Unwhere(Option<String>),
    Sort { column: String, multi: bool },
    Unsort,
    Page(usize),
    Next,
    Previous,
    First,
    Last,
    Size(usize),
    Hide(String),
    Show(Option<String>),
    Select(String),
    SelectPage(bool),
    Range(String),
    Clear,
    Open(String),
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equals,
    AtLeast,
    AtMost,
    Contains,
}

impl FromStr for FilterOp {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(FilterOp::Equals),
            ">=" => Ok(FilterOp::AtLeast),
            "<=" => Ok(FilterOp::AtMost),
            "~" => Ok(FilterOp::Contains),
            other => Err(CliError::command(format!("unknown operator '{}'", other))),
        }
    }
}

fn required(arg: Option<&str>, what: &str) -> Result<String, CliError> {
    arg.map(str::to_string)
        .ok_or_else(|| CliError::command(format!("missing {}", what)))
}

fn number(arg: Option<&str>) -> Result<usize, CliError> {
    let raw = required(arg, "number")?;
    raw.parse()
        .map_err(|_| CliError::command(format!("'{}' is not a number", raw)))
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match word {
            "filter" => Command::Filter(rest.to_string()),
            "where" => {
                let column = required(args.next(), "column")?;
                let op = required(args.next(), "operator")?.parse()?;
                let value = args.collect::<Vec<_>>().join(" ");
                if value.is_empty() {
                    return Err(CliError::command("missing value"));
                }
                Command::Where { column, op, value }
            }
            "unwhere" => Command::Unwhere(args.next().map(str::to_string)),
            "sort" => Command::Sort {
                column: required(args.next(), "column")?,
                multi: false,
            },
            "sort+" => Command::Sort {
                column: required(args.next(), "column")?,
                multi: true,
            },
            "unsort" => Command::Unsort,
            "page" => match number(args.next())? {
                0 => return Err(CliError::command("pages start at 1")),
                n => Command::Page(n - 1),
            },
            "next" => Command::Next,
            "prev" => Command::Previous,
            "first" => Command::First,
            "last" => Command::Last,
            "size" => Command::Size(number(args.next())?),
            "hide" => Command::Hide(required(args.next(), "column")?),
            "show" => match args.next() {
                None | Some("all") => Command::Show(None),
                Some(column) => Command::Show(Some(column.to_string())),
            },
            "select" => match args.next() {
                Some("page") => Command::SelectPage(true),
                key => Command::Select(required(key, "row key")?),
            },
            "unselect" => match args.next() {
                Some("page") => Command::SelectPage(false),
                _ => return Err(CliError::command("usage: unselect page")),
            },
            "range" => Command::Range(required(args.next(), "row key")?),
            "clear" => Command::Clear,
            "open" => Command::Open(required(args.next(), "row key")?),
            "reset" => Command::Reset,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CliError::command(format!("unknown command '{}'", other))),
        };
        Ok(command)
    }
}

/// Parse a filter operand according to the column's declared kind.
pub fn parse_value(kind: ValueKind, raw: &str) -> Result<CellValue, CliError> {
    let invalid = || CliError::command(format!("'{}' is not a valid {} value", raw, kind));
    match kind {
        ValueKind::Number => raw
            .parse::<i64>()
            .map(CellValue::from)
            .or_else(|_| raw.parse::<f64>().map(CellValue::from))
            .map_err(|_| invalid()),
        ValueKind::Decimal => Decimal::from_str(raw).map(CellValue::from).map_err(|_| invalid()),
        ValueKind::Bool => raw.parse::<bool>().map(CellValue::from).map_err(|_| invalid()),
        ValueKind::Date => chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(CellValue::from)
            .map_err(|_| invalid()),
        ValueKind::DateTime => chrono::DateTime::parse_from_rfc3339(raw)
            .map(|dt| CellValue::from(dt.with_timezone(&chrono::Utc)))
            .map_err(|_| invalid()),
        ValueKind::Text | ValueKind::Any => Ok(CellValue::from(raw)),
    }
}

/// Requests the engine forwarded to the row source in server mode.
#[derive(Debug, Default)]
struct Requests {
    page: Option<usize>,
    page_size: Option<usize>,
}

/// Owns the table and, in server mode, the paged row source.
pub struct Shell {
    table: TableEngine<RevenueRow>,
    source: Option<PagedSource>,
    requests: Rc<RefCell<Requests>>,
}

impl Shell {
    /// Build a shell over the sample report.
    ///
    /// With `server` set, rows are served one page at a time and page
    /// changes go through the row source.
    pub fn new(settings: TableSettings, server: bool) -> Result<Self, CliError> {
        let requests = Rc::new(RefCell::new(Requests::default()));
        let rows = dataset::sample_rows();

        let (rows, source, pagination) = if server {
            let source = PagedSource::new(rows, settings.initial_page_size);
            let sink = requests.clone();
            let mode = PaginationMode::server(0, source.total_pages(), move |page| {
                sink.borrow_mut().page = Some(page);
            });
            (source.fetch(0), Some(source), mode)
        } else {
            (rows, None, PaginationMode::client())
        };

        let sink = requests.clone();
        let options = TableOptions::new(dataset::columns(), rows)
            .with_row_identity(dataset::row_key)
            .with_settings(settings)
            .with_pagination(pagination)
            .on_page_size_change(move |size| sink.borrow_mut().page_size = Some(size))
            .on_row_selection_change(|change: &SelectionChange| {
                log::info!("Selection now {:?}", change.selected);
            })
            .on_row_click(|row: &RevenueRow, key| {
                println!(
                    "{}: {} {} ({} discount), revenue {}, qty {}",
                    key,
                    row.period.format("%Y-%m"),
                    row.channel,
                    row.discount_mode,
                    row.revenue,
                    row.quantity
                );
            });

        Ok(Self {
            table: TableEngine::new(options)?,
            source,
            requests,
        })
    }

    pub fn table(&self) -> &TableEngine<RevenueRow> {
        &self.table
    }

    /// Apply one command. Returns `false` when the shell should exit.
    pub fn execute(&mut self, command: Command) -> Result<bool, CliError> {
        let result = match command {
            Command::Filter(text) => self.table.set_global_filter_text(text),
            Command::Where { column, op, value } => {
                let kind = self
                    .table
                    .column(&column)
                    .map(|c| c.value_kind())
                    .ok_or_else(|| CliError::command(format!("unknown column '{}'", column)))?;
                let filter = match op {
                    FilterOp::Contains => ColumnFilter::contains(value),
                    FilterOp::Equals => ColumnFilter::Equals(parse_value(kind, &value)?),
                    FilterOp::AtLeast => ColumnFilter::Between {
                        min: Some(parse_value(kind, &value)?),
                        max: None,
                    },
                    FilterOp::AtMost => ColumnFilter::Between {
                        min: None,
                        max: Some(parse_value(kind, &value)?),
                    },
                };
                self.table.set_column_filter(&column, filter)
            }
            Command::Unwhere(Some(column)) => self.table.clear_column_filter(&column),
            Command::Unwhere(None) => {
                let columns: Vec<String> = self.table.state().column_filters.keys().cloned().collect();
                let mut result = EventResult::Ignored;
                for column in columns {
                    if self.table.clear_column_filter(&column).is_handled() {
                        result = EventResult::Consumed;
                    }
                }
                result
            }
            Command::Sort { column, multi: false } => self.table.toggle_sort(&column),
            Command::Sort { column, multi: true } => self.table.toggle_sort_multi(&column),
            Command::Unsort => self.table.clear_sort(),
            Command::Page(page) => self.table.set_page_index(page),
            Command::Next => self.table.next_page(),
            Command::Previous => self.table.previous_page(),
            Command::First => self.table.first_page(),
            Command::Last => self.table.last_page(),
            Command::Size(size) => self.table.set_page_size(size),
            Command::Hide(column) => self.table.set_column_visible(&column, false),
            Command::Show(Some(column)) => self.table.set_column_visible(&column, true),
            Command::Show(None) => self.table.show_all_columns(),
            Command::Select(key) => self.table.toggle_row_selected(&key),
            Command::SelectPage(selected) => self.table.toggle_all_on_page_selected(selected),
            Command::Range(key) => self.table.select_range(&key),
            Command::Clear => self.table.clear_selection(),
            Command::Open(key) => self.table.click_row(&key),
            Command::Reset => self.table.reset(),
            Command::Help => {
                println!("{}", HELP);
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        };

        self.serve_requests();
        if !result.is_handled() {
            log::debug!("Command had no effect");
        }
        Ok(true)
    }

    /// Answer page and page-size requests forwarded by a server-paginated table.
    fn serve_requests(&mut self) {
        let Some(source) = self.source.as_mut() else {
            self.requests.replace(Requests::default());
            return;
        };
        let Requests { page, page_size } = self.requests.replace(Requests::default());

        let page = match page_size {
            Some(size) => {
                source.set_page_size(size);
                self.table.apply_page_size(size);
                Some(0)
            }
            None => page,
        };
        if let Some(page) = page {
            self.table.set_loading(true);
            let rows = source.fetch(page);
            let total_pages = source.total_pages();
            self.table.set_rows(rows);
            self.table.set_server_page(page, total_pages);
            self.table.set_loading(false);
        }
    }

    /// Read commands from `input` until it ends or `quit`, drawing the
    /// table after each one.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<(), CliError> {
        writeln!(output, "{}", view::draw(&self.table().render()))?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    if !self.execute(command)? {
                        break;
                    }
                    writeln!(output, "{}", view::draw(&self.table().render()))?;
                }
                Err(err) => writeln!(output, "{}", err)?,
            }
            output.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("filter online".parse::<Command>().unwrap(), Command::Filter("online".into()));
        assert_eq!("filter".parse::<Command>().unwrap(), Command::Filter(String::new()));
        assert_eq!("page 2".parse::<Command>().unwrap(), Command::Page(1));
        assert_eq!("show all".parse::<Command>().unwrap(), Command::Show(None));
        assert_eq!(
            "where revenue >= 1200.50".parse::<Command>().unwrap(),
            Command::Where {
                column: "revenue".into(),
                op: FilterOp::AtLeast,
                value: "1200.50".into(),
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("page 0".parse::<Command>().is_err());
        assert!("size many".parse::<Command>().is_err());
        assert!("where kpi".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_value_by_kind() {
        assert_eq!(parse_value(ValueKind::Number, "12").unwrap(), CellValue::Int(12));
        assert_eq!(parse_value(ValueKind::Number, "0.5").unwrap(), CellValue::Float(0.5));
        assert_eq!(
            parse_value(ValueKind::Decimal, "10.25").unwrap(),
            CellValue::Decimal(Decimal::new(1025, 2))
        );
        assert!(parse_value(ValueKind::Date, "March").is_err());
    }

    #[test]
    fn test_server_shell_serves_pages() {
        let mut shell = Shell::new(TableSettings::new(), true).unwrap();
        assert_eq!(shell.table().page_count(), 4);
        shell.execute(Command::Next).unwrap();
        assert_eq!(shell.table().page_index(), 1);
        assert_eq!(shell.table().page_keys()[0], "202401-3-1");

        shell.execute(Command::Size(20)).unwrap();
        assert_eq!(shell.table().page_index(), 0);
        assert_eq!(shell.table().page_count(), 2);
        assert_eq!(shell.table().page_rows().len(), 20);
    }

    #[test]
    fn test_client_shell_column_filter() {
        let mut shell = Shell::new(TableSettings::new(), false).unwrap();
        shell
            .execute("where channel = Online".parse().unwrap())
            .unwrap();
        assert_eq!(shell.table().filtered_row_count(), 9);
        shell.execute(Command::Unwhere(None)).unwrap();
        assert_eq!(shell.table().filtered_row_count(), 36);
    }
}
