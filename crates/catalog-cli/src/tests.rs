//! Routing tests against deterministic stand-ins for the model and the stores

#[cfg(test)]
mod snapshot_tests {
    use crate::{ChatBot, Intent, RoutingPolicy, format_full};
    use async_trait::async_trait;
    use catalog_core::{
        ChatMessage, ChatRole, CourseCatalog, Error, GenerationConfig, GenerationResult,
        LLMProvider, Result, SearchConfig, SearchResult, VectorDocument, VectorStore,
    };
    use catalog_rag::{CourseIndex, LocalVectorStore};
    use insta::assert_snapshot;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const SCHEDULE: &str = "\
Subject,Course Number,Section,CRN,Schedule Type Code,Campus Code,Title Short Desc,Instruction Mode Desc,Meeting Type Codes,Meet Days,Begin Time,End Time,Meet Start,Meet End,Building,Room,Actual Enrollment,Primary Instructor First Name,Primary Instructor Last Name,Primary Instructor Email,College
RHET,120,03,40211,LEC,M,Written Communication I,In-Person,CLAS,TR,0955,1140,8/20/24,12/4/24,KA,167,18,Phil,Choong,pchoong@usfca.edu,AS
PHIL,110,01,40555,LEC,M,Great Philosophical Questions,In-Person,CLAS,MWF,1045,1150,8/20/24,12/4/24,LM,345,35,Philip,Peterson,ppeterson@usfca.edu,AS
PHIL,240,02,40556,LEC,M,Ethics,In-Person,CLAS,MW,1315,1500,8/20/24,12/4/24,LM,346,28,Philip,Peterson,ppeterson@usfca.edu,AS
BIOL,385,01,41234,LEC,M,Bioinformatics,In-Person,CLAS,TR,1430,1615,8/20/24,12/4/24,KA,311,22,Naupaka,Zimmerman,nzimmerman@usfca.edu,AS
BAT,101,01,99999,LEC,G,The Dark Knight's Tactics,In-Person,CLAS,MWF,2100,2300,8/20/24,12/4/24,Wayne Tower,B1,12,Bruce,Wayne,bwayne@gotham.edu,AS
";

    const ANSWER: &str = "stub answer";

    /// Records every (question, system prompt) pair it is asked
    #[derive(Clone, Default)]
    struct RecordingLLM {
        calls: Arc<Mutex<Vec<(String, String)>>>,
        fail: bool,
    }

    impl RecordingLLM {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LLMProvider for RecordingLLM {
        async fn chat_completion_with_config(
            &self,
            messages: &[ChatMessage],
            config: &GenerationConfig,
        ) -> Result<GenerationResult> {
            let content_of = |role: ChatRole| {
                messages
                    .iter()
                    .find(|m| m.role == role)
                    .map(|m| m.content.clone())
                    .unwrap_or_default()
            };
            self.calls
                .lock()
                .unwrap()
                .push((content_of(ChatRole::User), content_of(ChatRole::System)));

            if self.fail {
                return Err(Error::Network("connection reset".to_string()));
            }
            Ok(GenerationResult {
                text: ANSWER.to_string(),
                model_id: config.model_id.clone(),
                tokens_used: None,
            })
        }

        fn model_id(&self) -> &str {
            "stub-model"
        }
    }

    /// Local store that counts searches
    struct CountingStore {
        inner: LocalVectorStore,
        searches: Arc<AtomicUsize>,
    }

    impl CountingStore {
        fn new() -> (Self, Arc<AtomicUsize>) {
            let searches = Arc::new(AtomicUsize::new(0));
            let store = Self {
                inner: LocalVectorStore::new(),
                searches: searches.clone(),
            };
            (store, searches)
        }
    }

    #[async_trait]
    impl VectorStore for CountingStore {
        async fn connect(&mut self) -> Result<()> {
            self.inner.connect().await
        }

        async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
            self.inner.store_batch(documents).await
        }

        async fn search(&self, query: &str, config: &SearchConfig) -> Result<SearchResult> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            self.inner.search(query, config).await
        }

        async fn count(&self) -> Result<usize> {
            self.inner.count().await
        }

        fn is_connected(&self) -> bool {
            self.inner.is_connected()
        }
    }

    /// Store whose searches always fail
    struct UnreachableStore;

    #[async_trait]
    impl VectorStore for UnreachableStore {
        async fn connect(&mut self) -> Result<()> {
            Ok(())
        }

        async fn store_batch(&self, documents: Vec<VectorDocument>) -> Result<Vec<String>> {
            Ok(documents.into_iter().map(|d| d.id).collect())
        }

        async fn search(&self, _query: &str, _config: &SearchConfig) -> Result<SearchResult> {
            Err(Error::Network("connection refused".to_string()))
        }

        async fn count(&self) -> Result<usize> {
            Ok(0)
        }

        fn is_connected(&self) -> bool {
            true
        }
    }

    struct Harness {
        bot: ChatBot<RecordingLLM, CountingStore>,
        llm: RecordingLLM,
        course_searches: Arc<AtomicUsize>,
        instructor_searches: Arc<AtomicUsize>,
    }

    impl Harness {
        fn searches(&self) -> (usize, usize) {
            (
                self.course_searches.load(Ordering::SeqCst),
                self.instructor_searches.load(Ordering::SeqCst),
            )
        }
    }

    async fn harness(catalog: CourseCatalog, indexed: bool, llm: RecordingLLM) -> Harness {
        let (courses, course_searches) = CountingStore::new();
        let (instructors, instructor_searches) = CountingStore::new();
        let mut index = CourseIndex::new(courses, instructors);
        index.connect().await.unwrap();
        if indexed {
            index.add_courses(catalog.courses()).await.unwrap();
        }

        Harness {
            bot: ChatBot::new(llm.clone(), catalog, index),
            llm,
            course_searches,
            instructor_searches,
        }
    }

    fn catalog() -> CourseCatalog {
        CourseCatalog::parse(SCHEDULE).unwrap()
    }

    #[tokio::test]
    async fn test_named_instructor_skips_vector_search() {
        let h = harness(catalog(), true, RecordingLLM::default()).await;

        let answer = h.bot.answer_question("What does Bruce Wayne teach?").await.unwrap();

        assert!(answer.contains("The Dark Knight's Tactics"));
        assert_eq!(h.searches(), (0, 0));
        assert!(h.llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_nickname_resolves_to_canonical_name() {
        let h = harness(catalog(), true, RecordingLLM::default()).await;

        let answer = h
            .bot
            .answer_question("What courses is Phil Peterson teaching?")
            .await
            .unwrap();

        assert!(answer.starts_with("Here are the courses taught by Philip Peterson:\n"));
        assert!(answer.contains("Great Philosophical Questions, Section: 01, CRN: 40555 in LM, Room 345"));
        assert!(answer.contains("Ethics, Section: 02, CRN: 40556 in LM, Room 346"));
        assert!(!answer.contains("Written Communication I"));
    }

    #[tokio::test]
    async fn test_recorded_nickname_matches_another_alias() {
        // The section lists "Phil Choong"; the question uses the "Dr. Choong" alias.
        let h = harness(catalog(), false, RecordingLLM::default()).await;

        let answer = h.bot.answer_question("what is dr. choong teaching").await.unwrap();
        assert!(answer.contains("Written Communication I, Section: 03, CRN: 40211 in KA, Room 167"));
    }

    #[tokio::test]
    async fn test_catalog_only_instructor_is_looked_up() {
        let h = harness(catalog(), true, RecordingLLM::default()).await;

        let answer = h
            .bot
            .answer_question("Which classes does naupaka zimmerman have?")
            .await
            .unwrap();
        assert!(answer.contains("Bioinformatics, Section: 01, CRN: 41234 in KA, Room 311"));
        assert_eq!(h.searches(), (0, 0));
    }

    #[tokio::test]
    async fn test_instructor_without_courses() {
        let courses = catalog()
            .courses()
            .iter()
            .filter(|c| c.subject != "BAT")
            .cloned()
            .collect();
        let h = harness(CourseCatalog::from_courses("Subject", courses), false, RecordingLLM::default()).await;

        let answer = h.bot.answer_question("What does B. Wayne teach?").await.unwrap();
        assert_eq!(answer, "No courses found for Bruce Wayne.");
    }

    #[tokio::test]
    async fn test_empty_catalog_is_no_data_error() {
        let h = harness(CourseCatalog::default(), false, RecordingLLM::default()).await;

        let result = h.bot.answer_question("What does Bruce Wayne teach?").await;
        assert!(matches!(result, Err(Error::NoCourseData(_))));
    }

    #[tokio::test]
    async fn test_no_matches_uses_general_prompt() {
        let h = harness(catalog(), false, RecordingLLM::default()).await;

        let answer = h
            .bot
            .answer_question("Can I learn guitar this semester?")
            .await
            .unwrap();

        assert_eq!(answer, ANSWER);
        assert_eq!(h.searches(), (1, 0));
        let calls = h.llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "Can I learn guitar this semester?");
        assert_eq!(calls[0].1, Intent::General.system_message());
    }

    #[tokio::test]
    async fn test_matches_become_system_prompt() {
        let h = harness(catalog(), true, RecordingLLM::default()).await;

        h.bot.answer_question("Where does Bioinformatics meet?").await.unwrap();

        assert_eq!(h.searches(), (1, 0));
        let (_, system) = &h.llm.calls()[0];
        assert!(system.starts_with(
            "Based on the available information, here are the relevant matches:\n\n- Subject: BIOL."
        ));
        assert!(system.contains("Building: KA. Room: 311."));
        assert!(system.ends_with("\nPlease use this information to answer the user's question."));
    }

    #[tokio::test]
    async fn test_instructor_questions_search_instructor_collection() {
        let h = harness(catalog(), true, RecordingLLM::default()).await;

        h.bot
            .answer_question("Which instructor teaches Ethics?")
            .await
            .unwrap();

        assert_eq!(h.searches(), (0, 1));
        let (_, system) = &h.llm.calls()[0];
        assert!(system.contains("- Instructor: Philip Peterson."));
    }

    #[tokio::test]
    async fn test_model_failure_is_wrapped() {
        let h = harness(catalog(), false, RecordingLLM::failing()).await;

        let result = h.bot.answer_question("Can I learn guitar?").await;
        match result {
            Err(Error::LLMProvider(message)) => {
                assert!(message.starts_with("chat completion failed:"));
                assert!(message.contains("connection reset"));
            }
            other => panic!("expected a wrapped model error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_failure_is_wrapped() {
        let llm = RecordingLLM::default();
        let index = CourseIndex::new(UnreachableStore, UnreachableStore);
        let bot = ChatBot::new(llm.clone(), catalog(), index);

        let result = bot.answer_question("Can I learn guitar this semester?").await;
        match result {
            Err(Error::VectorStore(message)) => {
                assert!(message.starts_with("similarity query failed:"));
                assert!(message.contains("connection refused"));
            }
            other => panic!("expected a wrapped search error, got {:?}", other),
        }
        assert!(llm.calls().is_empty());
    }

    #[tokio::test]
    async fn test_classifier_policy_goes_straight_to_model() {
        let h = harness(catalog(), true, RecordingLLM::default()).await;
        let bot = h.bot.with_policy(RoutingPolicy::Classifier);

        let answer = bot.answer_question("Where does Bioinformatics meet?").await.unwrap();
        assert_eq!(answer, ANSWER);

        bot.answer_question("What is Phil Peterson teaching?").await.unwrap();

        let calls = h.llm.calls();
        assert_eq!(calls[0].1, Intent::LocationLookup.system_message());
        assert_eq!(calls[1].0, "What is Philip Peterson teaching?");
        assert_eq!(calls[1].1, Intent::InstructorLookup.system_message());
        assert_eq!(
            (
                h.course_searches.load(Ordering::SeqCst),
                h.instructor_searches.load(Ordering::SeqCst)
            ),
            (0, 0)
        );
    }

    #[test]
    fn test_full_rendering_has_building_and_room() {
        let catalog = catalog();
        let bio = catalog
            .courses()
            .iter()
            .find(|c| c.title == "Bioinformatics")
            .unwrap();
        let out = format_full(bio);
        assert!(out.contains("KA"));
        assert!(out.contains("311"));
    }

    #[tokio::test]
    async fn test_direct_lookup_answer_snapshot() {
        let h = harness(catalog(), false, RecordingLLM::default()).await;
        let answer = h.bot.answer_question("what does bruce wayne teach").await.unwrap();

        assert_snapshot!(answer, @r###"
        Here are the courses taught by Bruce Wayne:
        The Dark Knight's Tactics, Section: 01, CRN: 99999 in Wayne Tower, Room B1

        Subject:                 BAT
        Course Number:           101
        Section:                 01
        CRN:                     99999
        Schedule Type Code:      LEC
        Campus Code:             G
        Title Short Desc:        The Dark Knight's Tactics
        Instruction Mode Desc:   In-Person
        Meeting Type Codes:      CLAS
        Meet Days:               MWF
        Begin Time:              2100
        End Time:                2300
        Meet Start:              8/20/24
        Meet End:                12/4/24
        Building:                Wayne Tower
        Room:                    B1
        Actual Enrollment:       12
        Instructor First Name:   Bruce
        Instructor Last Name:    Wayne
        Instructor Email:        bwayne@gotham.edu
        College:                 AS
        --------------------------------------------------
        "###);
    }
}
