//! HTML worksheet and grading report generators.
//!
//! Both produce a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use folquiz_core::catalog::find_builtin;
use folquiz_core::quiz::{InstantiatedProblem, Quiz};
use folquiz_core::report::QuizGradingReport;
use folquiz_core::statistics::StageStats;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn page_start(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
}

/// Generate a printable worksheet for a quiz.
///
/// The worksheet shows the model, the constant assignment, and each problem
/// with a note when a witness or counterexample may be asked for. It never
/// reveals truth values.
pub fn generate_quiz_html(quiz: &Quiz) -> String {
    let mut html = String::new();
    page_start(&mut html, &format!("folquiz worksheet {}", quiz.metadata.id));

    html.push_str("<header>\n");
    html.push_str("<h1>folquiz worksheet</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Quiz <code>{}</code> | {} problems | domain of {} | {}</p>\n",
        quiz.metadata.id,
        quiz.len(),
        quiz.metadata.domain_size,
        quiz.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"instructions\">\n");
    html.push_str("<h2>Instructions</h2>\n");
    html.push_str("<p>Decide whether each sentence is true (T) or false (F) in the model below. ");
    html.push_str("If a true existential claim is marked <em>witness</em>, name an individual that makes it true. ");
    html.push_str("If a false universal claim is marked <em>counterexample</em>, name an individual it fails for.</p>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"model\">\n");
    html.push_str("<h2>Model</h2>\n");
    html.push_str(&format!(
        "<p>Domain: {{ {} }}</p>\n",
        quiz.model
            .domain()
            .iter()
            .map(|x| html_escape(x))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    html.push_str("<table class=\"extensions\">\n<thead><tr><th>Individual</th>");
    for letter in quiz.model.predicate_letters() {
        html.push_str(&format!("<th>{letter}</th>"));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for individual in quiz.model.domain() {
        html.push_str(&format!("<tr><td>{}</td>", html_escape(individual)));
        for letter in quiz.model.predicate_letters() {
            if quiz.model.holds(letter, individual) {
                html.push_str("<td class=\"pass\">&#10003;</td>");
            } else {
                html.push_str("<td></td>");
            }
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table>\n");

    if !quiz.constants.is_empty() {
        html.push_str("<p>Constants: ");
        let assigned: Vec<_> = quiz
            .constants
            .iter()
            .map(|(letter, individual)| {
                format!("<code>{letter}</code> = {}", html_escape(individual))
            })
            .collect();
        html.push_str(&assigned.join(", "));
        html.push_str("</p>\n");
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"problems\">\n");
    html.push_str("<h2>Problems</h2>\n");
    html.push_str("<table>\n<thead><tr><th>#</th><th>Stage</th><th>Sentence</th><th>T / F</th><th>Individual</th></tr></thead>\n<tbody>\n");
    for problem in &quiz.problems {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td><code>{}</code>{}</td><td class=\"blank\"></td><td class=\"blank\"></td></tr>\n",
            problem.number,
            problem.stage.index(),
            html_escape(&problem.formula),
            support_hint(problem)
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn support_hint(problem: &InstantiatedProblem) -> &'static str {
    match (problem.requires_witness, problem.requires_counterexample) {
        (true, _) => " <span class=\"hint\">witness if true</span>",
        (_, true) => " <span class=\"hint\">counterexample if false</span>",
        _ => "",
    }
}

/// Generate an HTML report from a graded quiz.
pub fn generate_report_html(report: &QuizGradingReport) -> String {
    let mut html = String::new();
    page_start(&mut html, &format!("folquiz report {}", report.quiz_id));

    html.push_str("<header>\n");
    html.push_str("<h1>folquiz report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Quiz <code>{}</code> | rendered {}</p>\n",
        report.quiz_id,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"score\">{}/{} correct ({}%)</p>\n",
        report.correct_problems, report.total_problems, report.percentage
    ));
    if report.witnesses.required > 0 {
        html.push_str(&format!(
            "<p>Witnesses and counterexamples: {}/{} supplied correctly</p>\n",
            report.witnesses.supplied_correctly, report.witnesses.required
        ));
    }

    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Stage</th><th>Correct</th><th>Truth values</th><th>Accuracy</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for s in &report.per_stage {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}/{}</td><td>{}/{}</td><td>{:.1}%</td></tr>\n",
            s.stage,
            s.correct,
            s.total,
            s.truth_values_correct,
            s.total,
            s.accuracy * 100.0
        ));
    }
    html.push_str("</tbody></table>\n");

    if !report.per_stage.is_empty() {
        html.push_str(&generate_bar_chart(&report.per_stage));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Problems</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Sentence</th><th onclick=\"sortTable(2)\">Answer</th><th onclick=\"sortTable(3)\">Expected</th><th onclick=\"sortTable(4)\">Feedback</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for r in &report.results {
        let class = if r.correct { "pass" } else { "fail" };
        let answer = match &r.submitted_witness {
            Some(w) => format!("{} ({})", truth_label(r.submitted_truth_value), html_escape(w)),
            None => truth_label(r.submitted_truth_value).to_string(),
        };

        let mut feedback = Vec::new();
        if !r.truth_value_correct {
            feedback.push("Wrong truth value.".to_string());
        }
        if let Some(message) = &r.witness_message {
            feedback.push(html_escape(message));
        }
        if !r.correct {
            if let Some(note) = find_builtin(&r.template_id).and_then(|t| t.scope_note) {
                feedback.push(format!("<em>{}</em>", html_escape(note)));
            }
        }

        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td><code>{}</code></td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            r.number,
            html_escape(&r.formula),
            answer,
            truth_label(r.correct_answer),
            feedback.join(" ")
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

fn truth_label(value: bool) -> &'static str {
    if value {
        "T"
    } else {
        "F"
    }
}

/// Write a quiz worksheet to a file.
pub fn write_quiz_html(quiz: &Quiz, path: &Path) -> Result<()> {
    write_file(path, generate_quiz_html(quiz))
}

/// Write an HTML grading report to a file.
pub fn write_report_html(report: &QuizGradingReport, path: &Path) -> Result<()> {
    write_file(path, generate_report_html(report))
}

fn write_file(path: &Path, html: String) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn generate_bar_chart(per_stage: &[StageStats]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 160;

    let total_height = per_stage.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, stats) in per_stage.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = (stats.accuracy * max_width as f64) as usize;

        let color = if stats.accuracy >= 0.8 {
            "#22c55e"
        } else if stats.accuracy >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">Stage {}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&stats.stage.to_string())
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            stats.accuracy * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
@media print { :root { --bg: #fff; --fg: #000; } th { cursor: default; } }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { font-size: 1.5rem; font-weight: bold; }
.hint { color: #6b7280; font-size: 0.8rem; font-style: italic; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
table.extensions { width: auto; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
td.blank { min-width: 6rem; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.95rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = parseFloat(va), nb = parseFloat(vb);
    if (!isNaN(na) && !isNaN(nb)) return asc ? na - nb : nb - na;
    return asc ? va.localeCompare(vb) : vb.localeCompare(va);
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
