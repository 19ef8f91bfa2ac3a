use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::model::{QuestionBank, ResultTier};
use crate::time::{fixed_clock, fixed_now};

fn build_question(id: usize) -> Question {
    let options = vec!["A".into(), "B".into(), "C".into(), "D".into()];
    Question::new(format!("q{id}"), format!("Question {id}?"), options, id % 4)
        .unwrap()
        .with_explanation(format!("Because of {id}."))
}

fn build_bank(n: usize) -> QuestionBank {
    QuestionBank::new((0..n).map(build_question).collect()).unwrap()
}

fn started(bank_size: usize, count: usize) -> (QuizSession, Vec<Effect>) {
    let settings = QuizSettings::with_question_count(count).unwrap();
    let mut session = QuizSession::new(settings, fixed_clock());
    let mut rng = StdRng::seed_from_u64(42);
    let effects = session.start(&build_bank(bank_size), &mut rng).unwrap();
    (session, effects)
}

fn correct_now(session: &QuizSession) -> usize {
    session.current_question().unwrap().correct_answer()
}

fn wrong_now(session: &QuizSession) -> usize {
    let question = session.current_question().unwrap();
    (question.correct_answer() + 1) % question.option_count()
}

fn answer(session: &mut QuizSession, index: usize) {
    session.select_answer(index).unwrap();
    session.confirm().unwrap();
    session.confirm().unwrap();
}

fn run_out_clock(session: &mut QuizSession) -> Vec<Effect> {
    let token = session.armed_timer().expect("timer armed");
    let mut effects = Vec::new();
    for _ in 0..session.settings().seconds_per_question() {
        effects.extend(session.tick(token));
    }
    effects
}

#[test]
fn start_samples_and_arms_first_countdown() {
    let (session, effects) = started(10, 5);

    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.questions().len(), 5);
    assert_eq!(session.current_index(), Some(0));
    assert!(session.answers().is_empty());
    assert_eq!(session.selected_answer(), None);
    assert!(!session.is_revealed());
    assert_eq!(session.time_remaining(), 15);
    assert_eq!(session.started_at(), Some(fixed_now()));

    let token = session.armed_timer().unwrap();
    assert_eq!(effects[0], Effect::ArmTimer(token));
    assert!(effects.contains(&Effect::Announce(Announcement::QuestionStarted {
        position: 1,
        total: 5
    })));
}

#[test]
fn start_is_rejected_outside_intro() {
    let (mut session, _) = started(3, 3);
    let err = session
        .start(&build_bank(3), &mut StdRng::seed_from_u64(1))
        .unwrap_err();
    assert_eq!(
        err,
        QuizError::InvalidTransition {
            phase: Phase::Active,
            action: Action::Start
        }
    );
}

#[test]
fn ticks_count_down_and_announce_thresholds() {
    let (mut session, _) = started(3, 3);
    let token = session.armed_timer().unwrap();

    let mut announced = Vec::new();
    for _ in 0..10 {
        for effect in session.tick(token) {
            if let Effect::Announce(a) = effect {
                announced.push(a);
            }
        }
    }

    assert_eq!(session.time_remaining(), 5);
    assert_eq!(
        announced,
        vec![
            Announcement::TimeRunningLow {
                seconds_remaining: 10
            },
            Announcement::TimeRunningLow {
                seconds_remaining: 5
            },
        ]
    );
}

#[test]
fn selecting_stops_the_clock() {
    let (mut session, _) = started(3, 3);
    let token = session.armed_timer().unwrap();
    session.tick(token);
    session.tick(token);

    let effects = session.select_answer(1).unwrap();
    assert_eq!(effects, vec![Effect::DisarmTimer]);
    assert_eq!(session.armed_timer(), None);

    for _ in 0..30 {
        assert!(session.tick(token).is_empty());
    }
    assert_eq!(session.time_remaining(), 13);
    assert_eq!(session.phase(), Phase::Active);
}

#[test]
fn reselecting_overwrites_previous_choice() {
    let (mut session, _) = started(3, 3);
    session.select_answer(0).unwrap();
    let effects = session.select_answer(2).unwrap();

    assert!(effects.is_empty());
    assert_eq!(session.selected_answer(), Some(2));
}

#[test]
fn select_rejects_out_of_range_option() {
    let (mut session, _) = started(3, 3);
    assert_eq!(
        session.select_answer(4).unwrap_err(),
        QuizError::OptionOutOfRange {
            index: 4,
            options: 4
        }
    );
    assert_eq!(session.selected_answer(), None);
    assert!(session.armed_timer().is_some());
}

#[test]
fn confirm_without_selection_is_rejected() {
    let (mut session, _) = started(3, 3);
    assert_eq!(session.confirm().unwrap_err(), QuizError::NoSelection);
    assert!(!session.is_revealed());
}

#[test]
fn confirm_reveals_then_advances() {
    let (mut session, _) = started(3, 3);
    let correct = correct_now(&session);
    session.select_answer(correct).unwrap();

    let reveal = session.confirm().unwrap();
    assert!(session.is_revealed());
    assert_eq!(session.current_index(), Some(0));
    assert!(reveal.contains(&Effect::Announce(Announcement::AnswerRevealed { correct: true })));
    assert_eq!(
        session.select_answer(0).unwrap_err(),
        QuizError::AlreadyRevealed
    );

    let advance = session.confirm().unwrap();
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.answers(), &[Answer::Selected(correct)]);
    assert_eq!(session.selected_answer(), None);
    assert!(!session.is_revealed());
    assert_eq!(session.time_remaining(), 15);
    let token = session.armed_timer().unwrap();
    assert!(advance.contains(&Effect::ArmTimer(token)));
}

#[test]
fn expiry_enters_decision_and_extend_resumes() {
    let (mut session, _) = started(3, 3);
    let old_token = session.armed_timer().unwrap();

    let effects = run_out_clock(&mut session);
    assert_eq!(session.phase(), Phase::TimeExpiredDecision);
    assert_eq!(session.time_remaining(), 0);
    assert_eq!(session.armed_timer(), None);
    assert!(effects.contains(&Effect::DisarmTimer));
    assert!(effects.contains(&Effect::Announce(Announcement::TimeExpired)));
    assert!(session.select_answer(0).is_err());

    let effects = session.extend_time().unwrap();
    let new_token = session.armed_timer().unwrap();
    assert_ne!(new_token, old_token);
    assert_eq!(effects, vec![Effect::ArmTimer(new_token)]);
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.time_remaining(), 15);
    assert!(session.answers().is_empty());

    assert!(session.tick(old_token).is_empty());
    session.tick(new_token);
    assert_eq!(session.time_remaining(), 14);
}

#[test]
fn decision_actions_are_rejected_while_clock_runs() {
    let (mut session, _) = started(3, 3);
    assert!(matches!(
        session.extend_time(),
        Err(QuizError::InvalidTransition {
            action: Action::ExtendTime,
            ..
        })
    ));
    assert!(matches!(
        session.skip_question(),
        Err(QuizError::InvalidTransition {
            action: Action::SkipQuestion,
            ..
        })
    ));
}

#[test]
fn scenario_a_mixed_answers_score_three() {
    let (mut session, _) = started(5, 5);
    for i in 0..5 {
        let pick = if i % 2 == 0 {
            correct_now(&session)
        } else {
            wrong_now(&session)
        };
        answer(&mut session, pick);
    }

    assert_eq!(session.phase(), Phase::NameEntry);
    assert_eq!(session.answers().len(), 5);
    assert_eq!(session.score(), 3);
    let outcome = session.outcome().unwrap();
    assert_eq!((outcome.score, outcome.total, outcome.percentage), (3, 5, 60));
    assert_eq!(outcome.tier, ResultTier::GoodProgress);
    assert_eq!(session.completed_at(), Some(fixed_now()));
}

#[test]
fn scenario_b_skip_after_expiry() {
    let (mut session, _) = started(5, 5);
    run_out_clock(&mut session);

    let effects = session.skip_question().unwrap();

    assert_eq!(session.answers(), &[Answer::Skipped]);
    assert_eq!(session.score(), 0);
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.phase(), Phase::Active);
    assert_eq!(session.time_remaining(), 15);
    assert!(matches!(effects.first(), Some(Effect::ArmTimer(_))));
}

#[test]
fn scenario_c_extend_then_answer_correctly() {
    let (mut session, _) = started(5, 5);
    run_out_clock(&mut session);
    session.extend_time().unwrap();

    let token = session.armed_timer().unwrap();
    for _ in 0..14 {
        session.tick(token);
    }
    assert_eq!(session.time_remaining(), 1);
    let correct = correct_now(&session);
    answer(&mut session, correct);

    assert_eq!(session.answers(), &[Answer::Selected(correct)]);
    assert!(session.answers()[0].is_correct_for(&session.questions()[0]));
    assert_eq!(session.score(), 1);
}

#[test]
fn scenario_d_question_count_is_clamped() {
    let (session, _) = started(30, 100);
    assert_eq!(session.questions().len(), 30);
    assert_eq!(session.progress().unwrap().total, 30);
}

#[test]
fn skipping_last_question_finishes_quiz() {
    let (mut session, _) = started(2, 2);
    let correct = correct_now(&session);
    answer(&mut session, correct);
    run_out_clock(&mut session);

    let effects = session.skip_question().unwrap();

    assert_eq!(session.phase(), Phase::NameEntry);
    assert_eq!(session.answers(), &[Answer::Selected(correct), Answer::Skipped]);
    assert!(effects.contains(&Effect::Announce(Announcement::QuizCompleted {
        score: 1,
        total: 2
    })));
    assert_eq!(session.current_index(), None);
    assert_eq!(session.armed_timer(), None);
}

#[test]
fn submission_happens_once_and_reaches_results() {
    let (mut session, _) = started(1, 1);
    let correct = correct_now(&session);
    answer(&mut session, correct);

    let effects = session.submit_with_name("  Ada  ").unwrap();
    assert_eq!(
        effects,
        vec![Effect::SubmitScore(ScoreSubmission::new(
            1,
            1,
            Some("Ada".into())
        ))]
    );
    assert_eq!(session.phase(), Phase::Results);
    assert_eq!(session.player_name(), Some("Ada"));

    assert!(matches!(
        session.submit_anonymously(),
        Err(QuizError::InvalidTransition {
            phase: Phase::Results,
            action: Action::Submit
        })
    ));
}

#[test]
fn blank_name_submits_anonymously() {
    let (mut session, _) = started(1, 1);
    let wrong = wrong_now(&session);
    answer(&mut session, wrong);

    let effects = session.submit_with_name("   ").unwrap();
    let Effect::SubmitScore(submission) = &effects[0] else {
        panic!("expected submission, got {effects:?}");
    };
    assert!(submission.is_anonymous());
    assert_eq!((submission.score, submission.total), (0, 1));
    assert_eq!(session.player_name(), None);
}

#[test]
fn restart_yields_fresh_intro() {
    let (mut session, _) = started(3, 3);
    let old_id = session.id();
    for _ in 0..3 {
        let correct = correct_now(&session);
        answer(&mut session, correct);
    }
    session.submit_anonymously().unwrap();
    let last_token = session.countdown.last_issued();

    let effects = session.restart().unwrap();

    assert!(effects.is_empty());
    assert_eq!(session.phase(), Phase::Intro);
    assert_ne!(session.id(), old_id);
    assert!(session.answers().is_empty());
    assert!(session.questions().is_empty());
    assert_eq!(session.current_index(), None);
    assert_eq!(session.outcome(), None);
    assert_eq!(session.score(), 0);

    session
        .start(&build_bank(3), &mut StdRng::seed_from_u64(9))
        .unwrap();
    assert!(session.armed_timer().unwrap() > last_token);
}

#[test]
fn restart_is_only_allowed_from_results() {
    let (mut session, _) = started(3, 3);
    assert!(session.restart().is_err());
    assert_eq!(session.phase(), Phase::Active);
}

#[test]
fn dispatch_routes_events() {
    let (mut session, _) = started(2, 2);
    let token = session.armed_timer().unwrap();

    session.dispatch(QuizEvent::Tick(token)).unwrap();
    assert_eq!(session.time_remaining(), 14);

    session.dispatch(QuizEvent::SelectAnswer(1)).unwrap();
    session.dispatch(QuizEvent::Confirm).unwrap();
    session.dispatch(QuizEvent::Confirm).unwrap();
    assert_eq!(session.answers().len(), 1);

    let err = session.dispatch(QuizEvent::Restart).unwrap_err();
    assert_eq!(err.to_string(), "cannot restart during the active phase");
}

#[test]
fn random_play_keeps_score_and_history_invariants() {
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = rng.random_range(1..=8);
        let settings = QuizSettings::with_question_count(count).unwrap();
        let mut session = QuizSession::new(settings, fixed_clock());
        session.start(&build_bank(6), &mut rng).unwrap();

        while session.phase() != Phase::NameEntry {
            let before = session.answers().len();
            if rng.random_bool(0.3) {
                run_out_clock(&mut session);
                if rng.random_bool(0.5) {
                    session.skip_question().unwrap();
                } else {
                    session.extend_time().unwrap();
                    continue;
                }
            } else {
                let pick = rng.random_range(0..4);
                answer(&mut session, pick);
            }
            assert_eq!(session.answers().len(), before + 1);
            assert!(session.answers().len() <= session.questions().len());
        }

        let expected = session
            .questions()
            .iter()
            .zip(session.answers())
            .filter(|(q, a)| **a == Answer::Selected(q.correct_answer()))
            .count();
        assert_eq!(session.answers().len(), session.questions().len());
        assert_eq!(session.score(), expected);
        assert!(session.score() <= session.questions().len());
    }
}
