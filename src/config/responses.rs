//! Response catalog for Kotae.
//!
//! Every canned text and template is stored in both languages. The catalog can
//! be customized by placing a `responses.toml` in the custom responses
//! directory. The file is merged over the defaults key by key, so overriding
//! one language of an entry keeps the other.

use crate::error::{KotaeError, Result};
use crate::intent::Topic;
use crate::language::Language;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A text available in Japanese and English.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Bilingual {
    pub ja: String,
    pub en: String,
}

impl Bilingual {
    pub fn new(ja: &str, en: &str) -> Self {
        Self {
            ja: ja.to_string(),
            en: en.to_string(),
        }
    }

    /// The text for `language`. An empty entry counts as missing.
    pub fn get(&self, language: Language, key: &str) -> Result<&str> {
        let text = match language {
            Language::Ja => &self.ja,
            Language::En => &self.en,
        };

        if text.is_empty() {
            return Err(KotaeError::MissingResponse {
                key: key.to_string(),
                language: language.to_string(),
            });
        }
        Ok(text)
    }
}

/// A set of interchangeable phrases in both languages.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BilingualList {
    pub ja: Vec<String>,
    pub en: Vec<String>,
}

impl BilingualList {
    pub fn new(ja: &[&str], en: &[&str]) -> Self {
        Self {
            ja: ja.iter().map(|s| s.to_string()).collect(),
            en: en.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The phrases for `language`. An empty set counts as missing.
    pub fn get(&self, language: Language, key: &str) -> Result<&[String]> {
        let phrases = match language {
            Language::Ja => &self.ja,
            Language::En => &self.en,
        };

        if phrases.is_empty() {
            return Err(KotaeError::MissingResponse {
                key: key.to_string(),
                language: language.to_string(),
            });
        }
        Ok(phrases)
    }
}

/// Complete response catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Responses {
    pub canned: CannedResponses,
    pub topics: TopicResponses,
    pub general: GeneralResponses,
    pub repeat: RepeatResponses,
    /// Returned when generation fails.
    pub apology: ApologyResponses,
}

/// Fully static answers, one per topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CannedResponses {
    pub fear_overcoming: Bilingual,
    pub failure_overcoming: Bilingual,
    pub success: Bilingual,
    pub future_survival: Bilingual,
    pub yamaha_experience: Bilingual,
    pub hitachi_experience: Bilingual,
    pub panasonic_experience: Bilingual,
}

/// Introduction plus fallback for topics answered from retrieved passages.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TopicTemplate {
    pub intro: Bilingual,
    /// Used in place of passages when retrieval found nothing.
    pub fallback: Bilingual,
}

impl TopicTemplate {
    fn new(intro: Bilingual, fallback: Bilingual) -> Self {
        Self { intro, fallback }
    }
}

/// Templates for the context-aware topics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicResponses {
    pub business_strategy: TopicTemplate,
    pub leadership: TopicTemplate,
    pub global_strategy: TopicTemplate,
    pub digital_transformation: TopicTemplate,
}

/// Phrases for messages without a specific topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralResponses {
    /// One is picked at random and followed by passage content.
    pub prefixes: BilingualList,
    /// Used when nothing was retrieved.
    pub no_context: Bilingual,
    pub followup_intro: Bilingual,
    pub followup_fallback: Bilingual,
    /// Acknowledgements, one picked at random.
    pub reactions: BilingualList,
}

/// A stored answer recognised by marker substrings, with its text in both languages.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Translation {
    pub markers: Vec<String>,
    pub text: Bilingual,
}

impl Translation {
    /// Whether `response` contains any of this entry's markers.
    pub fn matches(&self, response: &str) -> bool {
        self.markers.iter().any(|m| !m.is_empty() && response.contains(m.as_str()))
    }
}

/// Texts for "say that again in another language" requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatResponses {
    pub no_previous: Bilingual,
    pub cannot_translate: Bilingual,
    /// Probed in order against the stored answer; first match wins.
    pub translations: Vec<Translation>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApologyResponses {
    pub error: Bilingual,
}

impl Responses {
    /// Load the catalog, applying `custom_dir/responses.toml` when present.
    pub fn load(custom_dir: Option<&str>) -> Result<Self> {
        let mut responses = Responses::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let responses_path = custom_path.join("responses.toml");
            if responses_path.exists() {
                let content = std::fs::read_to_string(&responses_path)?;
                let overrides: toml::Table = toml::from_str(&content)?;

                let mut merged = toml::Value::try_from(&responses)
                    .map_err(|e| KotaeError::Config(e.to_string()))?;
                merge_toml(&mut merged, toml::Value::Table(overrides));
                responses = merged.try_into()?;
            }
        }

        Ok(responses)
    }

    /// The static text family for `topic`, if it has one.
    pub fn canned(&self, topic: &Topic) -> Option<&Bilingual> {
        let canned = &self.canned;
        match topic {
            Topic::FearOvercoming => Some(&canned.fear_overcoming),
            Topic::FailureOvercoming => Some(&canned.failure_overcoming),
            Topic::Success => Some(&canned.success),
            Topic::FutureSurvival => Some(&canned.future_survival),
            Topic::YamahaExperience => Some(&canned.yamaha_experience),
            Topic::HitachiExperience => Some(&canned.hitachi_experience),
            Topic::PanasonicExperience => Some(&canned.panasonic_experience),
            _ => None,
        }
    }

    /// The passage template for `topic`, if it is answered from retrieval.
    pub fn template(&self, topic: &Topic) -> Option<&TopicTemplate> {
        let topics = &self.topics;
        match topic {
            Topic::BusinessStrategy => Some(&topics.business_strategy),
            Topic::Leadership => Some(&topics.leadership),
            Topic::GlobalStrategy => Some(&topics.global_strategy),
            Topic::DigitalTransformation => Some(&topics.digital_transformation),
            _ => None,
        }
    }

    /// First translation entry whose markers occur in `response`.
    pub fn find_translation(&self, response: &str) -> Option<&Translation> {
        self.repeat.translations.iter().find(|t| t.matches(response))
    }
}

/// Overlay `overrides` onto `base` key by key. Tables merge recursively;
/// any other value (including arrays) replaces what was there.
fn merge_toml(base: &mut toml::Value, overrides: toml::Value) {
    match (base, overrides) {
        (toml::Value::Table(base), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, value) => *base = value,
    }
}

fn yamaha() -> Bilingual {
    Bilingual::new(
        r#"大前研一は、マッキンゼー時代にヤマハの経営戦略に関わりました。

**ヤマハの成功要因**

1. **多角化戦略**：楽器からオートバイ、音響機器への展開
2. **グローバル展開**：海外市場での積極的な事業拡大
3. **ブランド価値**：世界で認知された「YAMAHA」ブランド
4. **技術革新**：研究開発への継続的な投資

大前研一はヤマハを日本の製造業の成功モデルと評価しています。"#,
        r#"Kenichi Ohmae was involved in YAMAHA's business strategy during his McKinsey years.

**YAMAHA's Success Factors**

1. **Diversification**: Expansion from instruments to motorcycles and audio equipment
2. **Global expansion**: Aggressive development of overseas markets
3. **Brand value**: Worldwide recognition of the "YAMAHA" brand
4. **Innovation**: Continuous investment in R&D

Ohmae regards YAMAHA as a model of successful Japanese manufacturing."#,
    )
}

fn hitachi() -> Bilingual {
    Bilingual::new(
        r#"大前研一は、日立の経営戦略や技術開発についてコンサルティングを行いました。

日立は日本の技術力を代表する企業であり、原子力技術の開発と運用で重要な役割を担ってきました。海外市場での競争力強化や、エネルギー・環境技術を通じた社会的責任にも取り組んでいます。

大前研一は日立の技術力と社会的責任を高く評価しています。"#,
        r#"Kenichi Ohmae provided consulting on Hitachi's business strategy and technology development.

**Hitachi's Characteristics**

1. **Technology**: A company representing Japan's engineering strength
2. **Nuclear technology**: An important role in development and operation
3. **Global expansion**: Strengthening competitiveness in overseas markets
4. **Social responsibility**: Energy and environmental technology

Ohmae sees Hitachi as a symbol of Japan's technological prowess."#,
    )
}

fn panasonic() -> Bilingual {
    Bilingual::new(
        r#"大前研一は、パナソニック（旧松下電器）を日本型経営の代表例として取り上げています。

松下幸之助の経営理念、事業部制による自主責任経営、そして家電から住宅・車載分野への事業転換は、大前研一が企業変革を論じる際の重要な題材です。"#,
        r#"Kenichi Ohmae often cites Panasonic (formerly Matsushita Electric) as a representative of Japanese-style management.

Konosuke Matsushita's management philosophy, the autonomous division system, and the shift from consumer electronics to housing and automotive businesses are recurring examples when Ohmae discusses corporate transformation."#,
    )
}

impl Default for CannedResponses {
    fn default() -> Self {
        Self {
            fear_overcoming: Bilingual::new(
                r#"大前研一は、恐怖や困難を乗り越えることについて次のように述べています。

「変化を恐れるな。むしろ、変化しないことを恐れよ。」

大前研一自身も、マッキンゼー時代や独立後の挑戦で多くの恐怖に直面しました。彼が強調するのは次の3つです。

1. **現実を直視する勇気**：恐怖の正体を理解し、具体的なリスクを分析する
2. **準備と学習**：知識とスキルを身につけて恐怖を小さくする
3. **行動の重要性**：恐怖を感じながらも一歩を踏み出す

乗り越えられなかった経験についても、大前研一は「失敗から学ぶことが最も重要」と述べ、完璧よりも継続的な改善を重んじています。"#,
                r#"Kenichi Ohmae has spoken about overcoming fear and difficulty as follows:

"Don't fear change. Rather, fear not changing."

Ohmae himself faced many fears at McKinsey and after going independent. He stresses three principles:

1. **Courage to face reality**: Understand what you fear and analyze the concrete risks
2. **Preparation and learning**: Shrink fear by building knowledge and skills
3. **Action**: Take a step forward even while afraid

On experiences he could not overcome, Ohmae says that learning from failure matters most, and he values continuous improvement over perfection."#,
            ),
            failure_overcoming: Bilingual::new(
                r#"大前研一は、失敗を乗り越えることについて次のように語っています。

「失敗は成功への道筋である」

**乗り越えた経験**
- マッキンゼー初期の困難：新しい分析手法を開発して克服
- 独立時の不安：確かな知識基盤を築いて克服
- グローバル戦略の複雑さ：3C分析の枠組みで整理

**乗り越えられなかった経験**
- 完璧な予測の不可能性：市場の不確実性は完全には読めないと悟った
- 人間関係の複雑さ：すべての関係を完璧に管理することの難しさ

大前研一は、失敗を恐れるよりも失敗から学ぶ姿勢こそが大切だと強調しています。"#,
                r#"Kenichi Ohmae offers these insights on overcoming failure:

"Failure is the path to success"

**Experiences overcome**
- Early difficulties at McKinsey: overcome by developing new analytical methods
- Anxiety about going independent: overcome by building a solid knowledge base
- The complexity of global strategy: structured with the 3C framework

**Experiences not overcome**
- The impossibility of perfect prediction: market uncertainty can never be fully forecast
- The complexity of human relationships: no one manages every relationship perfectly

Ohmae stresses that learning from failure matters more than fearing it."#,
            ),
            success: Bilingual::new(
                r#"大前研一は、成功を次のように定義しています。

「真の成功とは、持続可能な価値の創造である」

**成功の要素**
1. **戦略的思考**：長期的な視点で意思決定する
2. **グローバルな視点**：国境を越えて市場を理解する
3. **継続的な学習**：常に新しい知識を吸収する
4. **価値創造**：顧客と社会に本当の価値を届ける

大前研一は「成功は終着点ではなく、新しい挑戦の始まり」と述べています。"#,
                r#"Kenichi Ohmae defines success as follows:

"True success is the creation of sustainable value"

**Elements of success**
1. **Strategic thinking**: Decide with a long-term perspective
2. **Global perspective**: Understand markets beyond borders
3. **Continuous learning**: Keep absorbing new knowledge
4. **Value creation**: Deliver real value to customers and society

Ohmae says that success is not a destination but the beginning of new challenges."#,
            ),
            future_survival: Bilingual::new(
                r#"大前研一は、50代が2030年代を生き抜くために次のような助言をしています。

**2030年代の生存戦略**

1. **デジタルリテラシーの向上**：AIや自動化への適応は不可欠
2. **グローバルな視点の維持**：国境を越えた競争と機会を理解する
3. **継続的な学習**：新しい知識とスキルを身につけ続ける
4. **価値創造への集中**：経験を活かした独自の価値を提供する
5. **健康管理**：長く働き続けるための土台を守る

大前研一は「年齢は経験の証であり、新しい挑戦への準備期間」と述べ、50代を新しい可能性の始まりと捉えることを勧めています。"#,
                r#"Kenichi Ohmae offers this advice for people in their 50s who want to thrive in the 2030s:

**Survival strategy for the 2030s**

1. **Digital literacy**: Adapting to AI and automation is essential
2. **Global perspective**: Understand cross-border competition and opportunity
3. **Continuous learning**: Keep acquiring new knowledge and skills
4. **Value creation**: Use your experience to offer something unique
5. **Health**: Protect the foundation of a long career

Ohmae says that age is evidence of experience and a preparation period for new challenges, and he encourages seeing your 50s as the start of new possibilities."#,
            ),
            yamaha_experience: yamaha(),
            hitachi_experience: hitachi(),
            panasonic_experience: panasonic(),
        }
    }
}

impl Default for TopicResponses {
    fn default() -> Self {
        Self {
            business_strategy: TopicTemplate::new(
                Bilingual::new(
                    "大前研一のビジネス戦略論の核心は、以下の通りです：\n\n",
                    "The core of Kenichi Ohmae's business strategy theory is as follows:\n\n",
                ),
                Bilingual::new(
                    "戦略的思考、グローバルな視点、顧客価値の創造が重要です。",
                    "Strategic thinking, global perspective, and customer value creation are important.",
                ),
            ),
            leadership: TopicTemplate::new(
                Bilingual::new(
                    "大前研一のリーダーシップ論：\n\n",
                    "Kenichi Ohmae's leadership theory:\n\n",
                ),
                Bilingual::new(
                    "変化する環境に対応する能力と戦略的思考が、現代のリーダーに求められます。",
                    "Modern leaders need the ability to adapt to changing environments and to think strategically.",
                ),
            ),
            global_strategy: TopicTemplate::new(
                Bilingual::new(
                    "大前研一のグローバル戦略論：\n\n",
                    "Kenichi Ohmae's global strategy theory:\n\n",
                ),
                Bilingual::new(
                    "国境を越えた競争と協調のバランスが重要です。",
                    "Balance between cross-border competition and cooperation is important.",
                ),
            ),
            digital_transformation: TopicTemplate::new(
                Bilingual::new(
                    "大前研一のデジタル変革論：\n\n",
                    "Kenichi Ohmae's digital transformation theory:\n\n",
                ),
                Bilingual::new(
                    "デジタル技術を活用したビジネスモデルの革新が重要です。",
                    "Innovation of business models using digital technology is important.",
                ),
            ),
        }
    }
}

impl Default for GeneralResponses {
    fn default() -> Self {
        Self {
            prefixes: BilingualList::new(
                &[
                    "大前研一の考えによると、",
                    "大前研一はこのように述べています：",
                    "大前研一の視点から見ると、",
                    "大前研一の分析では、",
                ],
                &[
                    "According to Kenichi Ohmae's analysis, ",
                    "Kenichi Ohmae suggests that ",
                    "From Kenichi Ohmae's perspective, ",
                    "Based on Kenichi Ohmae's research, ",
                ],
            ),
            no_context: Bilingual::new(
                "申し訳ございません。関連する情報が見つかりませんでした。",
                "I apologize, but I couldn't find relevant information.",
            ),
            followup_intro: Bilingual::new(
                "先ほどの話に関連して、大前研一は以下のように詳しく説明しています：\n\n",
                "Regarding your follow-up question, Kenichi Ohmae provides more detailed insights:\n\n",
            ),
            followup_fallback: Bilingual::new(
                "先ほどの質問に関連して、大前研一の考えをさらに詳しく説明します。前回の内容を踏まえて、より実践的なアプローチを考えることが重要です。",
                "Regarding your follow-up question, let me elaborate on Kenichi Ohmae's perspective. Building on our previous discussion, it's important to consider more practical approaches.",
            ),
            reactions: BilingualList::new(
                &[
                    "理解していただけて嬉しいです。他にも何かご質問はありますか？",
                    "お役に立てて良かったです。さらに詳しく知りたいことがあれば、お気軽にお聞きください。",
                    "ありがとうございます。大前研一の知見が少しでもお役に立てれば幸いです。",
                    "素晴らしい反応をありがとうございます。他にも興味のあるトピックがあれば、お聞かせください。",
                ],
                &[
                    "I'm glad you found it helpful. Do you have any other questions?",
                    "I'm pleased to be of assistance. If you'd like to know more about anything, feel free to ask.",
                    "Thank you. I hope Kenichi Ohmae's insights have been useful to you.",
                    "Thank you for your positive response. If you have other topics in mind, please let me know.",
                ],
            ),
        }
    }
}

impl Default for RepeatResponses {
    fn default() -> Self {
        Self {
            no_previous: Bilingual::new(
                "前の回答が見つかりません。",
                "No previous response was found.",
            ),
            cannot_translate: Bilingual::new(
                "前の回答を日本語で翻訳できませんでした。",
                "The previous response could not be translated into English.",
            ),
            translations: vec![
                Translation {
                    markers: vec!["YAMAHA".to_string(), "ヤマハ".to_string()],
                    text: yamaha(),
                },
                Translation {
                    markers: vec!["Hitachi".to_string(), "日立".to_string()],
                    text: hitachi(),
                },
                Translation {
                    markers: vec!["Panasonic".to_string(), "パナソニック".to_string()],
                    text: panasonic(),
                },
            ],
        }
    }
}

impl Default for ApologyResponses {
    fn default() -> Self {
        Self {
            error: Bilingual::new(
                "申し訳ございません。応答の生成中にエラーが発生しました。",
                "I'm sorry, an error occurred while generating the response.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_is_complete() {
        let responses = Responses::default();
        let topics = [
            Topic::FearOvercoming,
            Topic::FailureOvercoming,
            Topic::Success,
            Topic::FutureSurvival,
            Topic::YamahaExperience,
            Topic::HitachiExperience,
            Topic::PanasonicExperience,
        ];

        for topic in topics {
            let text = responses.canned(&topic).unwrap();
            assert!(text.get(Language::Ja, topic.name()).is_ok());
            assert!(text.get(Language::En, topic.name()).is_ok());
            assert!(responses.template(&topic).is_none());
        }

        assert!(responses.canned(&Topic::General).is_none());
        assert!(responses.template(&Topic::GlobalStrategy).is_some());
    }

    #[test]
    fn test_canned_texts_detect_as_their_language() {
        let responses = Responses::default();
        for topic in [Topic::YamahaExperience, Topic::HitachiExperience, Topic::FearOvercoming] {
            let text = responses.canned(&topic).unwrap();
            assert_eq!(crate::language::detect(&text.ja), Language::Ja);
            assert_eq!(crate::language::detect(&text.en), Language::En);
        }
    }

    #[test]
    fn test_find_translation_in_order() {
        let responses = Responses::default();
        let found = responses.find_translation("Some text about YAMAHA and Hitachi").unwrap();
        assert_eq!(found.markers[0], "YAMAHA");
        assert!(responses.find_translation("nothing relevant").is_none());
    }

    #[test]
    fn test_empty_entry_is_missing() {
        let text = Bilingual::new("日本語", "");
        assert_eq!(text.get(Language::Ja, "k").unwrap(), "日本語");
        let err = text.get(Language::En, "k").unwrap_err();
        assert!(matches!(err, KotaeError::MissingResponse { .. }));
    }

    #[test]
    fn test_load_custom_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("responses.toml"),
            "[canned.success]\nja = \"成功とは継続である\"\n",
        )
        .unwrap();

        let responses = Responses::load(dir.path().to_str()).unwrap();
        let success = responses.canned(&Topic::Success).unwrap();
        assert_eq!(success.ja, "成功とは継続である");
        // The other language keeps its built-in text
        assert_eq!(success.en, Responses::default().canned.success.en);
        // Untouched entries keep their defaults
        assert!(!responses.canned(&Topic::FearOvercoming).unwrap().en.is_empty());
    }

    #[test]
    fn test_override_replaces_translation_list() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("responses.toml"),
            "[[repeat.translations]]\nmarkers = [\"Sony\"]\ntext = { ja = \"ソニー\", en = \"Sony\" }\n",
        )
        .unwrap();

        let responses = Responses::load(dir.path().to_str()).unwrap();
        assert_eq!(responses.repeat.translations.len(), 1);
        assert_eq!(responses.repeat.translations[0].text.ja, "ソニー");
        assert!(!responses.repeat.no_previous.en.is_empty());
    }

    #[test]
    fn test_load_without_custom_dir() {
        let responses = Responses::load(None).unwrap();
        assert_eq!(responses.repeat.translations.len(), 3);
    }
}
