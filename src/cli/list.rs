use anyhow::Context;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use qaboard::{
    domain::relative_age, query, Backend, FilterSpec, FilterType, Question, Session, SortKey, Tag,
};
use serde::Serialize;
use tracing::instrument;

use super::terminal::{is_narrow, Colorize};

const DEFAULT_LIMIT: usize = 200;

/// Command arguments for `qa list`.
#[derive(Debug, Default, Parser)]
#[command(about = "List questions with filters and sorting")]
pub struct List {
    /// Which questions to show: all, unanswered or trending.
    #[arg(long)]
    filter: Option<FilterType>,

    /// Only questions sharing at least one of these tags (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "TAG")]
    tag: Vec<Tag>,

    /// Case-insensitive search in titles and descriptions.
    #[arg(long)]
    search: Option<String>,

    /// Reorder the filtered list: newest, votes or answers.
    #[arg(long)]
    sort: Option<SortKey>,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,

    /// Suppress headers and print one question per line for scripting.
    #[arg(long, short)]
    quiet: bool,

    /// Limit number of rows returned.
    #[arg(long)]
    limit: Option<usize>,

    /// Skip the first N rows.
    #[arg(long)]
    offset: Option<usize>,
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct SerializableRow<'a> {
    #[serde(flatten)]
    question: &'a Question,
    asked: String,
}

impl List {
    /// Runs the listing against the session's home view.
    ///
    /// Filter arguments replace the session's filter; with none given the
    /// current view is kept, so a session remembers its last listing.
    #[instrument(level = "debug", skip_all)]
    pub fn run<B: Backend>(self, session: &mut Session<B>) -> anyhow::Result<()> {
        if self.filter.is_some() || !self.tag.is_empty() || self.search.is_some() {
            let mut spec = FilterSpec::of_type(self.filter.unwrap_or_default())
                .with_tags(self.tag.iter().cloned());
            if let Some(term) = &self.search {
                spec = spec.with_search(term.as_str());
            }
            session.apply_filter(spec);
        }

        if let Some(key) = self.sort {
            session.sort_by(key);
        }

        let visible = session.visible();
        let total = visible.len();
        let limit = self
            .limit
            .and_then(|value| (value > 0).then_some(value))
            .unwrap_or(DEFAULT_LIMIT);
        let rows = query::page(&visible, self.offset.unwrap_or_default(), Some(limit));

        match self.output {
            OutputFormat::Table => {
                render_table(&rows, self.quiet);
                if !self.quiet {
                    println!(
                        "\n{}",
                        describe_view(total, session.filter(), session.sort()).dim()
                    );
                }
                Ok(())
            }
            OutputFormat::Json => render_json(&rows),
        }
    }
}

fn describe_view(total: usize, filter: &FilterSpec, sort: Option<SortKey>) -> String {
    let mut parts = vec![format!("{total} questions found"), format!("filter: {}", filter.kind)];
    if !filter.tags.is_empty() {
        let tags: Vec<&str> = filter.tags.iter().map(Tag::as_str).collect();
        parts.push(format!("tags: {}", tags.join(", ")));
    }
    if let Some(term) = &filter.search {
        parts.push(format!("search: {term}"));
    }
    if let Some(sort) = sort {
        parts.push(format!("sort: {sort}"));
    }
    parts.join(" · ")
}

fn render_table(rows: &[&Question], quiet: bool) {
    if quiet {
        for question in rows {
            println!("{}\t{}", question.id, question.title);
        }
        return;
    }

    if rows.is_empty() {
        println!("No questions found");
        println!("{}", "Try adjusting your filters or ask a new question!".dim());
        return;
    }

    let now = Utc::now();
    let mut headers = vec!["ID", "Votes", "Answers", "Title"];
    let narrow = is_narrow();
    if !narrow {
        headers.extend(["Tags", "Asked", "Author"]);
    }

    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|question| {
            let mut row = vec![
                question.id.to_string(),
                question.vote_count.to_string(),
                answers_cell(question),
                question.title.clone(),
            ];
            if !narrow {
                row.push(question.tags.to_string());
                row.push(relative_age(question.timestamp, now));
                row.push(question.author.name.clone());
            }
            row
        })
        .collect();

    // Determine column widths for alignment.
    let widths = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            data.iter()
                .map(|row| row[idx].chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect::<Vec<_>>();

    for (header, width) in headers.iter().zip(&widths) {
        print!("{header:<width$}  ");
    }
    println!();

    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in data {
        for (value, width) in row.iter().zip(&widths) {
            print!("{value:<width$}  ");
        }
        println!();
    }
}

fn answers_cell(question: &Question) -> String {
    if question.is_answered {
        format!("{} ✓", question.answer_count)
    } else {
        question.answer_count.to_string()
    }
}

fn render_json(rows: &[&Question]) -> anyhow::Result<()> {
    let now = Utc::now();
    let rows_out: Vec<SerializableRow> = rows
        .iter()
        .map(|&question| SerializableRow {
            question,
            asked: relative_age(question.timestamp, now),
        })
        .collect();

    serde_json::to_writer_pretty(std::io::stdout(), &rows_out)
        .context("failed to render json output")?;
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_filtered_and_sorted_views() {
        let spec = FilterSpec::of_type(FilterType::Unanswered)
            .with_tags([Tag::new("react").unwrap()])
            .with_search("hooks");

        assert_eq!(
            describe_view(1, &spec, Some(SortKey::Votes)),
            "1 questions found · filter: unanswered · tags: react · search: hooks · sort: votes"
        );
        assert_eq!(
            describe_view(6, &FilterSpec::default(), None),
            "6 questions found · filter: all"
        );
    }
}
