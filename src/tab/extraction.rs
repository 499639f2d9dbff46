// Merging the replies of the extraction model into a respondent document.

use std::collections::HashSet;

use crate::tab::*;

/// Separator appended after each accumulated answer.
const ACCUMULATE_SEPARATOR: &str = "  ";

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MergeSettings {
    /// Placeholder answers that never overwrite a field.
    pub deny_words: HashSet<String>,
    /// Sections whose answers are concatenated instead of overwritten.
    pub accumulate_sections: HashSet<String>,
}

/// Extracts the JSON object of a model reply.
///
/// Markdown code fences are removed. A reply that is not a JSON object
/// counts as an empty answer.
pub fn clean_model_reply(text: &str) -> JSValue {
    let cleaned = text.replace("```json", "").replace("```", "");
    match serde_json::from_str::<JSValue>(cleaned.trim()) {
        Ok(js @ JSValue::Object(_)) => js,
        Ok(js) => {
            warn!("clean_model_reply: expected an object, got {}", js);
            JSValue::Object(JSMap::new())
        }
        Err(e) => {
            let preview: String = cleaned.chars().take(100).collect();
            warn!("clean_model_reply: invalid JSON ({}): {:?}", e, preview);
            JSValue::Object(JSMap::new())
        }
    }
}

fn is_blank(value: &JSValue) -> bool {
    match value {
        JSValue::Null => true,
        JSValue::String(s) => s.is_empty(),
        JSValue::Array(a) => a.is_empty(),
        JSValue::Object(m) => m.is_empty(),
        _ => false,
    }
}

fn answer_text(value: &JSValue) -> String {
    match value {
        JSValue::String(s) => s.clone(),
        x => x.to_string(),
    }
}

/// Merges the replies, in order, into a copy of the taxonomy template.
///
/// The template has three levels: sections, groups and fields. Only the
/// fields of the template are filled; anything else in a reply is skipped
/// with a warning.
pub fn merge_answers(
    template: &JSValue,
    replies: &[JSValue],
    settings: &MergeSettings,
) -> TabResult<JSValue> {
    let mut res = match template {
        JSValue::Object(m) => m.clone(),
        _ => whatever!("The taxonomy template must be a JSON object"),
    };

    for (ridx, reply) in replies.iter().enumerate() {
        let sections = match reply.as_object() {
            Some(m) => m,
            None => {
                warn!("merge_answers: reply {} is not an object, skipping", ridx);
                continue;
            }
        };
        for (section, groups) in sections.iter() {
            let accumulate = settings.accumulate_sections.contains(section);
            for (group, fields) in groups.as_object().into_iter().flatten() {
                for (field, value) in fields.as_object().into_iter().flatten() {
                    if is_blank(value) {
                        continue;
                    }
                    if let JSValue::String(s) = value {
                        if settings.deny_words.contains(s) {
                            debug!(
                                "merge_answers: denied {:?} for {}/{}/{}",
                                s, section, group, field
                            );
                            continue;
                        }
                    }
                    let slot = match res
                        .get_mut(section)
                        .and_then(|g| g.get_mut(group))
                        .and_then(|f| f.get_mut(field))
                    {
                        Some(slot) => slot,
                        None => {
                            warn!(
                                "merge_answers: reply {}: {}/{}/{} is not in the template",
                                ridx, section, group, field
                            );
                            continue;
                        }
                    };
                    if accumulate {
                        let mut acc = match &*slot {
                            JSValue::Null => String::new(),
                            x => answer_text(x),
                        };
                        acc.push_str(&answer_text(value));
                        acc.push_str(ACCUMULATE_SEPARATOR);
                        *slot = JSValue::String(acc);
                    } else {
                        *slot = value.clone();
                    }
                }
                if !fields.is_object() {
                    warn!(
                        "merge_answers: reply {}: {}/{} is not an object, skipping",
                        ridx, section, group
                    );
                }
            }
            if !groups.is_object() {
                warn!(
                    "merge_answers: reply {}: {} is not an object, skipping",
                    ridx, section
                );
            }
        }
    }
    Ok(JSValue::Object(res))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> JSValue {
        json!({
            "A、基本信息": {"1、受访者": {"姓名": "", "职位": ""}},
            "总结标签": {"1、标签": {"关键词": ""}}
        })
    }

    fn settings() -> MergeSettings {
        MergeSettings {
            deny_words: ["无".to_string()].into_iter().collect(),
            accumulate_sections: ["总结标签".to_string()].into_iter().collect(),
        }
    }

    #[test]
    fn fences_are_stripped() {
        let reply = "```json\n{\"a\": {\"b\": {\"c\": \"d\"}}}\n```";
        assert_eq!(clean_model_reply(reply), json!({"a": {"b": {"c": "d"}}}));
    }

    #[test]
    fn invalid_replies_are_empty() {
        assert_eq!(clean_model_reply("I cannot help with that."), json!({}));
        assert_eq!(clean_model_reply("[1, 2]"), json!({}));
    }

    #[test]
    fn answers_overwrite_and_accumulate() {
        let replies = vec![
            json!({
                "A、基本信息": {"1、受访者": {"姓名": "张三", "职位": "无"}},
                "总结标签": {"1、标签": {"关键词": "成本"}}
            }),
            json!({
                "A、基本信息": {"1、受访者": {"姓名": "李四", "职位": "经理"}},
                "总结标签": {"1、标签": {"关键词": "效率"}}
            }),
            json!({
                "A、基本信息": {"1、受访者": {"姓名": "", "职位": null}}
            }),
        ];
        let res = merge_answers(&template(), &replies, &settings()).unwrap();
        assert_eq!(
            res,
            json!({
                "A、基本信息": {"1、受访者": {"姓名": "李四", "职位": "经理"}},
                "总结标签": {"1、标签": {"关键词": "成本  效率  "}}
            })
        );
    }

    #[test]
    fn accumulation_extends_the_template_value() {
        let template = json!({"总结标签": {"1、标签": {"关键词": "既有", "次数": 2}}});
        let replies = vec![
            json!({"总结标签": {"1、标签": {"关键词": "成本", "次数": 3}}}),
            json!({"总结标签": {"1、标签": {"关键词": "无"}}}),
        ];
        let res = merge_answers(&template, &replies, &settings()).unwrap();
        assert_eq!(
            res,
            json!({"总结标签": {"1、标签": {"关键词": "既有成本  ", "次数": "23  "}}})
        );
    }

    #[test]
    fn unknown_and_malformed_entries_are_skipped() {
        let replies = vec![
            json!({
                "Z、未知": {"1": {"x": "y"}},
                "A、基本信息": {"1、受访者": {"年龄": "30", "姓名": "王五"}, "2、公司": "flat"}
            }),
            json!("not an object"),
        ];
        let res = merge_answers(&template(), &replies, &settings()).unwrap();
        assert_eq!(res["A、基本信息"]["1、受访者"]["姓名"], json!("王五"));
        assert!(res.get("Z、未知").is_none());
        assert!(res["A、基本信息"]["1、受访者"].get("年龄").is_none());
    }

    #[test]
    fn template_must_be_an_object() {
        let res = merge_answers(&json!([]), &[], &MergeSettings::default());
        assert!(matches!(res, Err(TabError::Whatever { .. })));
    }
}
