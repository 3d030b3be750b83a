use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use emolabel_core::constants::{TIMESTAMP_COLUMN, VIDEO_ID_COLUMN};
use emolabel_core::{Clip, ClipSource, LabelForm, LabelSession, clips_from_url_list};
use emolabel_service::LabelService;
use emolabel_sheets::SheetsClient;

use crate::{SheetArgs, TemplateArgs, load_schema, read_url_list, resolve_settings};

/// What the annotator typed at a prompt.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Answer {
    Value(String),
    Next,
    Previous,
    Quit,
}

/// Interprets one line of input for a column.
///
/// Blank input takes `default`; a number picks from `choices` (1-based).
/// Free text is accepted only for columns without choices.
pub(crate) fn parse_answer(line: &str, choices: &[String], default: &str) -> Option<Answer> {
    let line = line.trim();
    match line {
        ":n" | ":next" => return Some(Answer::Next),
        ":p" | ":prev" => return Some(Answer::Previous),
        ":q" | ":quit" => return Some(Answer::Quit),
        "" => return Some(Answer::Value(default.to_owned())),
        _ => {},
    }
    if choices.is_empty() {
        return Some(Answer::Value(line.to_owned()));
    }
    if let Some(choice) = line.parse::<usize>().ok().and_then(|n| n.checked_sub(1)).and_then(|i| choices.get(i)) {
        return Some(Answer::Value(choice.clone()));
    }
    choices.iter().find(|c| c.eq_ignore_ascii_case(line)).map(|c| Answer::Value(c.clone()))
}

fn describe(clip: &Clip) -> String {
    match &clip.source {
        ClipSource::File(path) => path.display().to_string(),
        ClipSource::Url(url) => url.clone(),
    }
}

enum Step {
    Submit(LabelForm),
    Next,
    Previous,
    Quit,
}

fn prompt_clip<R: BufRead, W: Write>(session: &LabelSession, clip: &Clip, input: &mut R, out: &mut W) -> Result<Step> {
    let mut form = LabelForm::new(&session.schema);
    for column in &session.schema.columns {
        if column == TIMESTAMP_COLUMN {
            continue;
        }
        let choices = session.schema.choices_for(column);
        let default = if column == VIDEO_ID_COLUMN { clip.default_video_id() } else { String::new() };
        loop {
            if !choices.is_empty() {
                for (i, choice) in choices.iter().enumerate() {
                    writeln!(out, "  {}) {choice}", i + 1)?;
                }
            }
            if default.is_empty() {
                write!(out, "{column}: ")?;
            } else {
                write!(out, "{column} [{default}]: ")?;
            }
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(Step::Quit);
            }
            match parse_answer(&line, choices, &default) {
                Some(Answer::Value(value)) => {
                    form.set(column, value)?;
                    break;
                },
                Some(Answer::Next) => return Ok(Step::Next),
                Some(Answer::Previous) => return Ok(Step::Previous),
                Some(Answer::Quit) => return Ok(Step::Quit),
                None => writeln!(out, "  pick a number or one of the listed values")?,
            }
        }
    }

    write!(out, "uncertain? [y/N]: ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Step::Quit);
    }
    if matches!(line.trim(), "y" | "Y" | "yes") {
        form.mark_uncertain();
    }
    Ok(Step::Submit(form))
}

/// Walks the session's clips, prompting for each column and appending rows.
///
/// Returns the number of rows saved during the loop.
pub(crate) async fn label_loop<R: BufRead, W: Write>(
    service: &LabelService,
    session: &mut LabelSession,
    input: &mut R,
    out: &mut W,
) -> Result<usize> {
    let mut saved = 0_usize;
    while let Some(clip) = session.current().cloned() {
        let (cursor, total) = session.position();
        writeln!(out, "\n[{}/{}] {}", cursor + 1, total, describe(&clip))?;

        match prompt_clip(session, &clip, input, out)? {
            Step::Submit(form) => {
                let was_last = session.is_last();
                match service.submit_and_advance(session, &form).await {
                    Ok(_) => {
                        saved += 1;
                        match service.saved_rows().await {
                            Ok(total) => writeln!(out, "saved ({total} rows in sheet)")?,
                            Err(e) => {
                                tracing::warn!(error = %e, "Could not count saved rows");
                                writeln!(out, "saved")?;
                            },
                        }
                        if was_last {
                            break;
                        }
                    },
                    Err(e) if e.is_validation() => writeln!(out, "not saved: {e}")?,
                    Err(e) => writeln!(out, "not saved, try again: {e}")?,
                }
            },
            Step::Next => {
                session.advance();
            },
            Step::Previous => {
                session.previous();
            },
            Step::Quit => break,
        }
    }
    Ok(saved)
}

pub(crate) async fn run_label(
    templates: &TemplateArgs,
    sheet: &SheetArgs,
    paths: Vec<PathBuf>,
    urls: Option<PathBuf>,
) -> Result<()> {
    let mut clips: Vec<Clip> = paths.iter().map(|p| Clip::from_path(p)).collect();
    if let Some(path) = urls {
        clips.extend(clips_from_url_list(&read_url_list(&path)?));
    }
    if clips.is_empty() {
        bail!("no clips given: pass .mp4 paths or --urls <file>");
    }

    let schema = load_schema(templates)?;
    let settings = resolve_settings(sheet)?;
    let client = SheetsClient::from_credentials(&settings.credentials).context("loading service account")?;
    let mut session = LabelSession::new(settings, schema, clips);
    let (service, _) = LabelService::connect(Arc::new(client), &session).await?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();
    let saved = label_loop(&service, &mut session, &mut input, &mut out).await?;
    tracing::info!(saved, "Labeling finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::Path;

    use emolabel_core::{CredentialSource, Settings, Table, derive_schema};
    use emolabel_service::testing::FakeSpreadsheet;
    use emolabel_sheets::SpreadsheetApi;

    use super::*;

    fn session(clips: &[&str]) -> LabelSession {
        let settings = Settings {
            spreadsheet_id: "sheet1".to_owned(),
            worksheet_name: "labels_log".to_owned(),
            credentials: CredentialSource::File("service_account.json".into()),
        };
        let example = Table::from_rows([
            vec!["Video ID", "Emotion", "notes"],
            vec!["x", "Happy", ""],
            vec!["y", "Sad", ""],
        ]);
        let schema = derive_schema(None, Some(&example));
        let clips = clips.iter().map(|c| Clip::from_path(Path::new(c))).collect();
        LabelSession::new(settings, schema, clips)
    }

    async fn run(fake: &Arc<FakeSpreadsheet>, session: &mut LabelSession, script: &str) -> (usize, String) {
        let api: Arc<dyn SpreadsheetApi> = fake.clone();
        let (service, _) = LabelService::connect(api, session).await.unwrap();
        let mut input = Cursor::new(script.as_bytes());
        let mut out = Vec::new();
        let saved = label_loop(&service, session, &mut input, &mut out).await.unwrap();
        (saved, String::from_utf8(out).unwrap())
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_owned()).collect()
    }

    #[tokio::test]
    async fn test_label_loop_saves_each_clip_and_stops_after_last() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let mut session = session(&["clips/a.mp4", "clips/b.MP4"]);

        let script = "\n1\n\ny\n\nsad\nfoggy\n\n";
        let (saved, out) = run(&fake, &mut session, script).await;

        assert_eq!(saved, 2);
        assert_eq!(session.position(), (1, 2));
        assert!(out.contains("video_id [a]: "));
        assert!(out.contains("video_id [b]: "));
        let rows = fake.rows("labels_log");
        assert_eq!(rows[0], row(&["video_id", "Emotion", "notes"]));
        assert_eq!(rows[1], row(&["a", "Happy", "uncertain"]));
        assert_eq!(rows[2], row(&["b", "Sad", "foggy"]));
        assert_eq!(fake.count("append_row"), 2);
    }

    #[tokio::test]
    async fn test_label_loop_navigation_and_quit() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let mut session = session(&["clips/a.mp4", "clips/b.mp4"]);

        let (saved, out) = run(&fake, &mut session, ":n\n:p\n:q\n").await;

        assert_eq!(saved, 0);
        assert_eq!(session.position(), (0, 2));
        assert!(out.contains("[2/2] clips/b.mp4"));
        assert_eq!(out.matches("[1/2] clips/a.mp4").count(), 2);
        assert_eq!(fake.count("append_row"), 0);
    }

    #[tokio::test]
    async fn test_label_loop_retries_clip_after_validation_error() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let mut session = session(&["clips/.mp4"]);

        let (saved, out) = run(&fake, &mut session, "\n\n\n\nx\n1\n\n\n").await;

        assert_eq!(saved, 1);
        assert!(out.contains("not saved"));
        assert_eq!(out.matches("[1/1] clips/.mp4").count(), 2);
        assert_eq!(fake.count("append_row"), 1);
        assert_eq!(fake.rows("labels_log")[1], row(&["x", "Happy"]));
    }

    #[tokio::test]
    async fn test_label_loop_reprompts_on_unknown_choice() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let mut session = session(&["clips/a.mp4"]);

        let (saved, out) = run(&fake, &mut session, "\nSleepy\n2\n\n\n").await;

        assert_eq!(saved, 1);
        assert!(out.contains("pick a number"));
        assert_eq!(fake.rows("labels_log")[1], row(&["a", "Sad"]));
    }

    #[tokio::test]
    async fn test_label_loop_eof_quits_without_saving() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let mut session = session(&["clips/a.mp4", "clips/b.mp4"]);

        let (saved, _) = run(&fake, &mut session, "").await;
        assert_eq!(saved, 0);

        let (saved, _) = run(&fake, &mut session, "a\n1\n").await;
        assert_eq!(saved, 0);
        assert_eq!(session.position(), (0, 2));
        assert_eq!(fake.count("append_row"), 0);
    }

    #[tokio::test]
    async fn test_label_loop_continues_when_count_fails() {
        let fake = Arc::new(FakeSpreadsheet::new());
        let mut session = session(&["clips/a.mp4", "clips/b.mp4"]);
        fake.fail_read_all();

        let (saved, out) = run(&fake, &mut session, "\n1\n\n\n\n2\n\n\n").await;

        assert_eq!(saved, 2);
        assert!(out.contains("saved\n"));
        assert_eq!(fake.count("append_row"), 2);
    }

    fn choices(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_parse_answer_commands() {
        assert_eq!(parse_answer(":n\n", &[], ""), Some(Answer::Next));
        assert_eq!(parse_answer(":prev", &[], ""), Some(Answer::Previous));
        assert_eq!(parse_answer(" :q ", &[], ""), Some(Answer::Quit));
    }

    #[test]
    fn test_parse_answer_default_and_free_text() {
        assert_eq!(parse_answer("\n", &[], "clip_1"), Some(Answer::Value("clip_1".to_owned())));
        assert_eq!(parse_answer("dark road\n", &[], ""), Some(Answer::Value("dark road".to_owned())));
    }

    #[test]
    fn test_parse_answer_choices() {
        let opts = choices(&["Happy", "Calm", "Angry"]);
        assert_eq!(parse_answer("2", &opts, ""), Some(Answer::Value("Calm".to_owned())));
        assert_eq!(parse_answer("angry", &opts, ""), Some(Answer::Value("Angry".to_owned())));
        assert_eq!(parse_answer("4", &opts, ""), None);
        assert_eq!(parse_answer("0", &opts, ""), None);
        assert_eq!(parse_answer("Sleepy", &opts, ""), None);
        assert_eq!(parse_answer("", &opts, ""), Some(Answer::Value(String::new())));
    }

    #[test]
    fn test_describe_clip() {
        let clip = Clip::from_path(std::path::Path::new("clips/a.mp4"));
        assert_eq!(describe(&clip), "clips/a.mp4");
    }
}
