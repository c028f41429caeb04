use std::sync::Arc;

use chrono::NaiveDate;
use lifecal_markup::Document;
use lifecal_store::MemoryStore;

use crate::{
  Calendar, Command, Error, Outcome, Session,
  channel::{Outbound, channel},
  command::EventDay,
  handlers::{event, period},
  prompt,
  session::COMMAND_NOT_FOUND,
  test_helpers::Script,
};

const PATH: &str = "events.html";

const SAMPLE: &str = r##"<html>
<body>
<div id="periods">
    <div start="01/01/2024" end="02/01/2024" color="#aabbcc">Winter</div>
</div>
<div id="events">
    <div date="01/01/2024" credit="60">New year</div>
    <div date="03/05/2024" credit="75">Trip<br> Dinner</div>
    <div date="05/20/2024" credit="40">Rain</div>
</div>
</body>
</html>
"##;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate { date(2024, 6, 15) }

async fn store_with(text: &str) -> MemoryStore {
  let store = MemoryStore::new();
  store.insert(PATH, text).await;
  store
}

fn session(store: &MemoryStore, script: Script) -> Session<MemoryStore, Script> {
  Session::new(Calendar::new(Arc::new(store.clone()), PATH), script, "!")
}

async fn text(store: &MemoryStore) -> String { store.text(PATH).await.unwrap() }

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_event_is_inserted_in_date_order() {
  let store = store_with("<div id=\"events\">\n    <div date=\"01/01/2024\" credit=\"60\">New year</div>\n</div>").await;
  let script = Script::new(["a", "b", "no", "80", "yes"]);
  let mut s = session(&store, script);

  let outcome = s
    .run(Command::NewEvent(EventDay::On(date(2024, 6, 15))), today())
    .await
    .unwrap();
  assert!(matches!(outcome, Outcome::Committed { .. }));

  let after = text(&store).await;
  let old = after.find("01/01/2024").unwrap();
  let new = after
    .find(r#"<div date="06/15/2024" credit="80">a<br> b</div>"#)
    .unwrap();
  assert!(old < new);
  assert_eq!(store.commits().await[0].message, "Update events for 06/15/2024");
  assert_eq!(s.conversation_mut().last_sent(), event::ADDED);
}

#[tokio::test]
async fn new_event_defaults_to_today() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(["x", "no", "10", "yes"]));
  s.run(Command::NewEvent(EventDay::Today), today()).await.unwrap();
  assert!(text(&store).await.contains(r#"<div date="06/15/2024" credit="10">x</div>"#));
}

#[tokio::test]
async fn new_event_asks_for_a_date_when_the_argument_was_bad() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(["04/01/2024", "Hike", "no", "90", "yes"]));
  s.run(Command::NewEvent(EventDay::Ask), today()).await.unwrap();

  let after = text(&store).await;
  let hike = after.find("Hike").unwrap();
  assert!(after.find("03/05/2024").unwrap() < hike);
  assert!(hike < after.find("05/20/2024").unwrap());
}

#[tokio::test]
async fn stray_comment_in_a_line_is_refused_and_later_events_stay_visible() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new([
    "I <3 html <!-- wow", "I love html", "no", "70", "yes",
  ]));
  s.run(Command::NewEvent(EventDay::On(date(2024, 2, 1))), today()).await.unwrap();
  assert!(s.conversation_mut().saw(prompt::TEXT_GUIDANCE));

  let doc = Document::parse(&text(&store).await);
  assert!(doc.skipped().is_empty());
  let dates: Vec<_> = doc.events().into_iter().map(|(_, e)| e.date).collect();
  assert_eq!(dates, [
    date(2024, 1, 1),
    date(2024, 2, 1),
    date(2024, 3, 5),
    date(2024, 5, 20),
  ]);

  let mut s = session(&store, Script::new(["03/05/2024", "yes"]));
  let outcome = event::delete_event(&mut s).await.unwrap();
  assert!(matches!(outcome, Outcome::Committed { .. }));
}

#[tokio::test]
async fn blank_lines_are_asked_again() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(["", "b", "no", "70", "yes"]));
  s.run(Command::NewEvent(EventDay::On(date(2024, 2, 1))), today()).await.unwrap();

  assert!(s.conversation_mut().saw(prompt::BLANK_GUIDANCE));
  assert!(text(&store).await.contains(r#"<div date="02/01/2024" credit="70">b</div>"#));
}

#[tokio::test]
async fn new_event_on_an_existing_date_offers_revision() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(["no"]));

  let outcome = s
    .run(Command::NewEvent(EventDay::On(date(2024, 1, 1))), today())
    .await
    .unwrap();
  assert_eq!(outcome, Outcome::Declined);
  assert!(s.conversation_mut().saw("You already have events for 01/01/2024"));
  assert!(store.commits().await.is_empty());
}

#[tokio::test]
async fn revise_event_for_a_missing_date_can_be_declined_without_writing() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(["07/04/2024", "no"]));

  let outcome = event::revise_event(&mut s).await.unwrap();
  assert_eq!(outcome, Outcome::Declined);
  assert!(s.conversation_mut().saw(event::OFFER_ADD));
  assert_eq!(text(&store).await, SAMPLE);
  assert!(store.commits().await.is_empty());
}

#[tokio::test]
async fn revise_event_for_a_missing_date_can_create_it() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(["07/04/2024", "yes", "Fireworks", "no", "95", "yes"]));

  event::revise_event(&mut s).await.unwrap();
  assert!(text(&store).await.contains(r#"<div date="07/04/2024" credit="95">Fireworks</div>"#));
  assert_eq!(store.commits().await[0].message, "Revise events for 07/04/2024");
}

#[tokio::test]
async fn revising_one_line_keeps_the_others() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new([
    "3/5/2024", "yes", // find and agree to revise
    "x", "y", "z", "no", "50", // rebuild
    "revise", "2", "Y", "done", "yes",
  ]));

  event::revise_event(&mut s).await.unwrap();
  let after = text(&store).await;
  assert_eq!(
    after,
    SAMPLE.replace(
      r#"<div date="03/05/2024" credit="75">Trip<br> Dinner</div>"#,
      r#"<div date="03/05/2024" credit="50">x<br> Y<br> z</div>"#,
    )
  );
  assert_eq!(store.commits().await[0].message, "Revise events for 03/05/2024");
}

#[tokio::test]
async fn delete_event_leaves_other_fragments_untouched() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(["03/05/2024", "yes"]));

  event::delete_event(&mut s).await.unwrap();
  let expected = SAMPLE.replace(
    "\n    <div date=\"03/05/2024\" credit=\"75\">Trip<br> Dinner</div>",
    "",
  );
  assert_eq!(text(&store).await, expected);
  assert_eq!(store.commits().await[0].message, "Delete events for 03/05/2024");
}

#[tokio::test]
async fn delete_event_without_a_match_says_bye() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(["02/30/2024", "02/28/2024"]));

  assert_eq!(event::delete_event(&mut s).await.unwrap(), Outcome::Declined);
  assert_eq!(s.conversation_mut().last_sent(), "No events found for that date. Bye!");
}

// ─── Periods ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_period_goes_after_an_earlier_one() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new([
    "03/01/2024", "03/10/2024", "Spring break", "no", "#1a2b3c", "yes",
  ]));

  period::new_period(&mut s).await.unwrap();
  let after = text(&store).await;
  let winter = after.find("Winter").unwrap();
  let spring = after
    .find(r##"<div start="03/01/2024" end="03/10/2024" color="#1a2b3c">Spring break</div>"##)
    .unwrap();
  assert!(winter < spring);
  assert!(spring < after.find("id=\"events\"").unwrap());
  assert_eq!(
    store.commits().await[0].message,
    "Update periods for 03/01/2024 - 03/10/2024"
  );
}

#[tokio::test]
async fn new_period_rejects_an_end_before_its_start() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new([
    "03/10/2024", "03/01/2024", "03/12/2024", "Trip", "yes", "80", "120", "yes",
  ]));

  period::new_period(&mut s).await.unwrap();
  assert!(text(&store).await.contains(
    r#"<div class="base" credit="80" start="03/10/2024" end="03/12/2024" hue="120"><i>Trip</i></div>"#
  ));
}

#[tokio::test]
async fn declining_a_built_period_writes_nothing() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new([
    "03/01/2024", "03/10/2024", "Spring", "no", "#abc", "no",
  ]));

  assert_eq!(period::new_period(&mut s).await.unwrap(), Outcome::Declined);
  assert_eq!(text(&store).await, SAMPLE);
}

#[tokio::test]
async fn revise_period_swaps_in_place() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new([
    "01/01/2024", "02/01/2024", "yes", "Deep winter", "no", "#000000", "yes",
  ]));

  period::revise_period(&mut s).await.unwrap();
  assert_eq!(
    text(&store).await,
    SAMPLE.replace(
      r##"color="#aabbcc">Winter"##,
      r##"color="#000000">Deep winter"##,
    )
  );
}

#[tokio::test]
async fn delete_period_removes_the_exact_range_only() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(["01/01/2024", "02/02/2024"]));
  assert_eq!(period::delete_period(&mut s).await.unwrap(), Outcome::Declined);

  let mut s = session(&store, Script::new(["01/01/2024", "02/01/2024", "yes"]));
  period::delete_period(&mut s).await.unwrap();
  assert!(!text(&store).await.contains("Winter"));
  assert_eq!(
    store.commits().await[0].message,
    "Delete periods for 01/01/2024 - 02/01/2024"
  );
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn an_external_edit_mid_dialog_aborts_the_write() {
  let store = store_with(SAMPLE).await;
  let script = Script::new(["a", "no", "80", "yes"]).interfere(2, &store, PATH, "edited");
  let mut s = session(&store, script);

  let err = s
    .run(Command::NewEvent(EventDay::On(date(2024, 6, 15))), today())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Conflict));
  assert_eq!(text(&store).await, "edited");
  assert!(
    s.conversation_mut()
      .last_sent()
      .starts_with("Something went wrong, nothing was saved:")
  );
}

#[tokio::test]
async fn a_missing_document_is_reported() {
  let store = MemoryStore::new();
  let mut s = session(&store, Script::new(["01/01/2024"]));
  let err = s.run(Command::DeleteEvent, today()).await.unwrap_err();
  assert!(matches!(err, Error::DocumentNotFound(_)));
  assert!(s.conversation_mut().last_sent().contains(PATH));
}

#[tokio::test]
async fn leaving_mid_dialog_is_not_reported() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(["03/05/2024"]));

  let err = s.run(Command::DeleteEvent, today()).await.unwrap_err();
  assert!(matches!(err, Error::SessionClosed));
  assert_eq!(s.conversation_mut().last_sent(), event::CONFIRM_DELETE);
  assert!(store.commits().await.is_empty());
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_verbs_get_a_reply() {
  let store = store_with(SAMPLE).await;
  let mut s = session(&store, Script::new(Vec::<String>::new()));
  let outcome = s.run(Command::Unknown("party".into()), today()).await.unwrap();
  assert_eq!(outcome, Outcome::Answered);
  assert_eq!(s.conversation_mut().last_sent(), COMMAND_NOT_FOUND);
}

#[tokio::test]
async fn serve_runs_commands_and_ignores_chatter() {
  let store = store_with(SAMPLE).await;
  let (conv, mut ends) = channel();
  let s = Session::new(Calendar::new(Arc::new(store.clone()), PATH), conv, "!");
  let task = tokio::spawn(s.serve(today));

  for message in ["hello there", "!party", "!delete_event", "05/20/2024", "yes"] {
    ends.inbound.send(message.to_string()).unwrap();
  }
  drop(ends.inbound);
  task.await.unwrap();

  let mut replies = Vec::new();
  while let Ok(item) = ends.outbound.try_recv() {
    if let Outbound::Reply(text) = item {
      replies.push(text);
    }
  }
  assert_eq!(replies[0], COMMAND_NOT_FOUND);
  assert_eq!(replies.last().map(String::as_str), Some(event::DELETED));
  assert!(!text(&store).await.contains("Rain"));
}
