//! 子命令执行

use anyhow::{Context, Result};

use crate::cli::Command;
use crate::config::Config;
use crate::prompts::{InterviewerPromptParams, render_interviewer_prompt};
use crate::server::start_server;
use crate::services::ServiceContext;
use crate::services::analysis::analyze_communication;
use crate::services::outline::{OutlineRequest, generate_outline};
use crate::types::interview::Question;
use crate::utils::threads::do_parallel_with_limit;

pub async fn run(command: Command, config: Config) -> Result<()> {
    match command {
        Command::Serve { .. } => {
            let context = ServiceContext::new(config).await?;
            start_server(context).await
        }
        Command::Outline {
            objective,
            question_count,
            language,
            debug_language,
            json,
        } => {
            let context = ServiceContext::new(config).await?;
            let request = OutlineRequest {
                objective,
                language,
                question_count,
                debug_language,
                interview_id: None,
            };
            println!("🧠 正在生成访谈大纲...");
            let outline = generate_outline(&context, &request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outline)?);
                return Ok(());
            }
            println!("✅ 大纲生成完成");
            print_questions(&outline.draft_outline);
            if let Some(localized) = &outline.localized_outline {
                println!();
                println!("🌐 本地化版本:");
                print_questions(localized);
            }
            Ok(())
        }
        Command::Analyze {
            objective,
            transcripts,
        } => {
            let context = ServiceContext::new(config).await?;
            let max_parallels = context.config.llm.max_parallels;

            let mut texts = Vec::with_capacity(transcripts.len());
            for path in &transcripts {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("无法读取转写文件 {:?}", path))?;
                texts.push(text);
            }

            println!(
                "🔍 正在分析 {} 份通话转写（并发上限 {}）...",
                texts.len(),
                max_parallels
            );
            let futures: Vec<_> = texts
                .iter()
                .map(|text| analyze_communication(&context, text, &objective))
                .collect();
            let results = do_parallel_with_limit(futures, max_parallels).await;

            let mut failures = 0;
            for (path, result) in transcripts.iter().zip(results) {
                match result {
                    Ok(analysis) => {
                        println!("✅ {}", path.display());
                        println!("{}", serde_json::to_string_pretty(&analysis)?);
                    }
                    Err(e) => {
                        failures += 1;
                        eprintln!("❌ {}: {}", path.display(), e);
                    }
                }
            }
            if failures > 0 {
                anyhow::bail!("{} of {} transcripts failed analysis", failures, transcripts.len());
            }
            Ok(())
        }
        Command::AgentPrompt {
            name,
            mins,
            objective,
            questions,
            follow_ups,
        } => {
            let questions = questions
                .iter()
                .enumerate()
                .map(|(i, text)| Question::new(format!("q{}", i + 1), text.as_str(), follow_ups))
                .collect();
            let prompt = render_interviewer_prompt(&InterviewerPromptParams {
                mins,
                name,
                objective,
                questions,
            })?;
            println!("{}", prompt);
            Ok(())
        }
    }
}

fn print_questions(questions: &[Question]) {
    for question in questions {
        println!(
            "  {}. {} (追问: {})",
            question.id, question.text, question.follow_up_count
        );
    }
}
