//! End-to-end scenarios over the write side: posting gate, audience
//! resolution, fan-out, reactions and deletion.

use chrono::TimeDelta;
use flix_core::{Audience, DomainError, Partition};
use flix_service::dto::AddReactionRequest;
use flix_service::{
    GateKeeper, LifecycleReaper, MemoriesService, PostStore, PostingService, ReactionLedger,
};
use flix_store::StoreOp;
use integration_tests::{images, seed_circle, PostRequest, TestEngine, TestUser};

// ============================================================================
// Posting gate
// ============================================================================

#[tokio::test]
async fn test_gate_opens_after_window() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let gate = GateKeeper::new(&engine.ctx);

    let before = gate.status(alice.id, engine.now()).await?;
    assert!(!before.has_valid_post);
    assert!(before.hours_until_next_post.abs() < f64::EPSILON);

    engine.post(alice.id, Audience::Everyone).await?;

    engine.advance(TimeDelta::hours(3));
    let during = gate.status(alice.id, engine.now()).await?;
    assert!(during.has_valid_post);
    assert!((during.hours_until_next_post - 21.0).abs() < 1e-9);

    engine.advance(TimeDelta::hours(21));
    let after = gate.status(alice.id, engine.now()).await?;
    assert!(!after.has_valid_post);
    assert!(after.hours_until_next_post.abs() < f64::EPSILON);
    Ok(())
}

#[tokio::test]
async fn test_two_image_post_gate_timeline() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let author = TestUser::seed(&engine.store, "author");
    let gate = GateKeeper::new(&engine.ctx);
    let t0 = engine.now();

    let post_id = PostingService::new(&engine.ctx)
        .publish(author.id, PostRequest::everyone(2))
        .await?;
    let post = engine
        .read_copy(Partition::Global, post_id)
        .await?
        .expect("canonical copy");
    assert_eq!(post.images.len(), 2);
    assert_eq!(post.created_at, t0);

    let at_3h = gate.status(author.id, t0 + TimeDelta::hours(3)).await?;
    assert!(at_3h.has_valid_post);
    assert!((at_3h.hours_until_next_post - 21.0).abs() < 1e-9);

    let at_25h = gate.status(author.id, t0 + TimeDelta::hours(25)).await?;
    assert!(!at_25h.has_valid_post);
    assert!(at_25h.hours_until_next_post.abs() < f64::EPSILON);
    Ok(())
}

#[tokio::test]
async fn test_gate_remaining_time_never_increases() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let gate = GateKeeper::new(&engine.ctx);
    engine.post(alice.id, Audience::Everyone).await?;

    let mut previous = f64::INFINITY;
    for _ in 0..30 {
        let state = gate.status(alice.id, engine.now()).await?;
        assert!(state.hours_until_next_post <= previous);
        assert!(state.hours_until_next_post >= 0.0);
        previous = state.hours_until_next_post;
        engine.advance(TimeDelta::minutes(55));
    }
    assert!(previous.abs() < f64::EPSILON);
    Ok(())
}

#[tokio::test]
async fn test_publish_blocked_while_post_is_live() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let posting = PostingService::new(&engine.ctx);

    let first = posting.publish(alice.id, PostRequest::everyone(2)).await?;

    engine.advance(TimeDelta::hours(10));
    let err = posting
        .publish(alice.id, PostRequest::everyone(1))
        .await
        .unwrap_err();
    match err.domain() {
        Some(DomainError::PostingWindowActive { hours_remaining }) => {
            assert!((hours_remaining - 14.0).abs() < 1e-9);
        }
        other => panic!("expected PostingWindowActive, got {other:?}"),
    }

    engine.advance(TimeDelta::hours(14));
    let second = posting.publish(alice.id, PostRequest::everyone(1)).await?;
    assert_ne!(first, second);
    assert!(posting.current_post(alice.id, engine.now()).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_publish_without_images_rejected() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");

    let err = PostingService::new(&engine.ctx)
        .publish(alice.id, PostRequest::everyone(0))
        .await
        .unwrap_err();
    assert!(matches!(err.domain(), Some(DomainError::NoImageSelected)));
    assert_eq!(engine.store.document_count(Partition::Global), 0);
    Ok(())
}

// ============================================================================
// Audience resolution and fan-out
// ============================================================================

#[tokio::test]
async fn test_circle_post_fans_out_identical_copies() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let bob = TestUser::seed(&engine.store, "bob");
    let c1 = seed_circle(&engine.store, alice, &[bob]);
    let c2 = seed_circle(&engine.store, bob, &[alice]);

    let post_id = PostingService::new(&engine.ctx)
        .publish(alice.id, PostRequest::to_circles(&[c1, c2]))
        .await?;

    let canonical = engine
        .read_copy(Partition::Global, post_id)
        .await?
        .expect("canonical copy");
    for circle in [c1, c2] {
        let copy = engine
            .read_copy(Partition::Circle(circle), post_id)
            .await?
            .expect("fan-out copy");
        assert_eq!(copy, canonical);
    }
    assert!(engine.store.has_ledger(post_id));
    Ok(())
}

#[tokio::test]
async fn test_foreign_circles_dropped_from_audience() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let mallory = TestUser::seed(&engine.store, "mallory");
    let own = seed_circle(&engine.store, alice, &[]);
    let foreign = seed_circle(&engine.store, mallory, &[]);

    let post_id = PostingService::new(&engine.ctx)
        .publish(alice.id, PostRequest::to_circles(&[own, foreign]))
        .await?;

    let post = engine
        .read_copy(Partition::Global, post_id)
        .await?
        .expect("canonical copy");
    assert_eq!(post.audience, Audience::circles([own])?);
    assert!(engine
        .read_copy(Partition::Circle(foreign), post_id)
        .await?
        .is_none());
    Ok(())
}

#[tokio::test]
async fn test_only_foreign_circles_is_invalid_audience() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let mallory = TestUser::seed(&engine.store, "mallory");
    let foreign = seed_circle(&engine.store, mallory, &[]);

    let err = PostingService::new(&engine.ctx)
        .publish(alice.id, PostRequest::to_circles(&[foreign]))
        .await
        .unwrap_err();
    assert!(matches!(err.domain(), Some(DomainError::InvalidAudience)));
    assert_eq!(engine.store.document_count(Partition::Global), 0);
    Ok(())
}

#[tokio::test]
async fn test_partial_fanout_then_retry() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let c1 = seed_circle(&engine.store, alice, &[]);
    let c2 = seed_circle(&engine.store, alice, &[]);
    engine
        .store
        .inject_fault(StoreOp::Write, Some(Partition::Circle(c2)));

    let posts = PostStore::new(&engine.ctx);
    let err = posts
        .create(alice.id, images(1), None, Audience::circles([c1, c2])?)
        .await
        .unwrap_err();
    let (post_id, failed) = match err.domain() {
        Some(DomainError::PartialFanoutFailure {
            post_id,
            failed_circles,
        }) => (*post_id, failed_circles.clone()),
        other => panic!("expected PartialFanoutFailure, got {other:?}"),
    };
    assert_eq!(failed, vec![c2]);
    assert!(engine.read_copy(Partition::Global, post_id).await?.is_some());
    assert!(engine.read_copy(Partition::Circle(c1), post_id).await?.is_some());
    assert!(engine.read_copy(Partition::Circle(c2), post_id).await?.is_none());

    engine.store.heal_all();
    posts.retry_fanout(post_id, &failed).await?;

    let canonical = engine.read_copy(Partition::Global, post_id).await?;
    assert_eq!(engine.read_copy(Partition::Circle(c2), post_id).await?, canonical);
    assert_eq!(engine.store.document_count(Partition::Global), 1);
    assert_eq!(engine.store.document_count(Partition::Circle(c1)), 1);
    assert_eq!(engine.store.document_count(Partition::Circle(c2)), 1);
    Ok(())
}

#[tokio::test]
async fn test_ledger_failure_leaves_no_post_behind() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let c1 = seed_circle(&engine.store, alice, &[]);
    let c2 = seed_circle(&engine.store, alice, &[]);
    engine.store.inject_fault(StoreOp::LedgerCreate, None);

    let err = PostingService::new(&engine.ctx)
        .publish(alice.id, PostRequest::to_circles(&[c1, c2]))
        .await
        .unwrap_err();
    assert!(matches!(err.domain(), Some(DomainError::StoreError(_))));
    for partition in [Partition::Global, Partition::Circle(c1), Partition::Circle(c2)] {
        assert_eq!(engine.store.document_count(partition), 0);
    }

    engine.store.heal_all();
    PostingService::new(&engine.ctx)
        .publish(alice.id, PostRequest::to_circles(&[c1, c2]))
        .await?;
    assert_eq!(engine.store.document_count(Partition::Global), 1);
    Ok(())
}

// ============================================================================
// Reactions
// ============================================================================

#[tokio::test]
async fn test_reactions_fold_into_counts() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let bob = TestUser::seed(&engine.store, "bob");
    let carol = TestUser::seed(&engine.store, "carol");
    let post_id = engine.post(alice.id, Audience::Everyone).await?;

    let ledger = ReactionLedger::new(&engine.ctx);
    for (reactor, symbol) in [(bob, "🔥"), (carol, "🔥"), (bob, "😂")] {
        ledger
            .react(
                reactor.id,
                post_id,
                AddReactionRequest {
                    symbol: symbol.to_string(),
                },
            )
            .await?;
    }

    let summary = ledger.summary(post_id).await?;
    assert_eq!(summary.count("🔥"), 2);
    assert_eq!(summary.count("😂"), 1);
    assert_eq!(summary.total(), 3);
    Ok(())
}

#[tokio::test]
async fn test_reaction_on_missing_post() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let bob = TestUser::seed(&engine.store, "bob");
    let missing = integration_tests::unique_id();

    let err = ReactionLedger::new(&engine.ctx)
        .append(missing, bob.id, "🔥", engine.now())
        .await
        .unwrap_err();
    assert!(matches!(err.domain(), Some(DomainError::PostNotFound(id)) if *id == missing));
    Ok(())
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_removes_every_copy_and_ledger() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let bob = TestUser::seed(&engine.store, "bob");
    let c1 = seed_circle(&engine.store, alice, &[bob]);
    let c2 = seed_circle(&engine.store, alice, &[]);
    let post_id = engine.post(alice.id, Audience::circles([c1, c2])?).await?;
    ReactionLedger::new(&engine.ctx)
        .append(post_id, bob.id, "🔥", engine.now())
        .await?;

    let reaper = LifecycleReaper::new(&engine.ctx);
    let err = reaper.delete(bob.id, post_id).await.unwrap_err();
    assert!(matches!(err.domain(), Some(DomainError::Forbidden)));

    reaper.delete(alice.id, post_id).await?;

    for partition in [Partition::Global, Partition::Circle(c1), Partition::Circle(c2)] {
        assert!(engine.read_copy(partition, post_id).await?.is_none());
    }
    assert!(!engine.store.has_ledger(post_id));
    assert!(ReactionLedger::new(&engine.ctx)
        .summary(post_id)
        .await?
        .is_empty());
    Ok(())
}

#[tokio::test]
async fn test_partial_delete_then_retry() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let c1 = seed_circle(&engine.store, alice, &[]);
    let c2 = seed_circle(&engine.store, alice, &[]);
    let post_id = engine.post(alice.id, Audience::circles([c1, c2])?).await?;
    engine
        .store
        .inject_fault(StoreOp::Delete, Some(Partition::Circle(c1)));

    let reaper = LifecycleReaper::new(&engine.ctx);
    let err = reaper.delete(alice.id, post_id).await.unwrap_err();
    match err.domain() {
        Some(DomainError::PartialDeleteFailure { surviving, .. }) => {
            assert_eq!(surviving, &vec![Partition::Global, Partition::Circle(c1)]);
        }
        other => panic!("expected PartialDeleteFailure, got {other:?}"),
    }
    assert!(engine.read_copy(Partition::Global, post_id).await?.is_some());
    assert!(engine.read_copy(Partition::Circle(c2), post_id).await?.is_none());

    engine.store.heal_all();
    reaper.delete(alice.id, post_id).await?;
    assert_eq!(engine.store.document_count(Partition::Global), 0);
    assert_eq!(engine.store.document_count(Partition::Circle(c1)), 0);

    let err = reaper.delete(alice.id, post_id).await.unwrap_err();
    assert!(matches!(err.domain(), Some(DomainError::PostNotFound(_))));
    Ok(())
}

// ============================================================================
// Memories
// ============================================================================

#[tokio::test]
async fn test_memories_keep_expired_posts() -> anyhow::Result<()> {
    let engine = TestEngine::start()?;
    let alice = TestUser::seed(&engine.store, "alice");
    let first = engine.post(alice.id, Audience::Everyone).await?;
    engine.advance(TimeDelta::days(3));
    let second = engine.post(alice.id, Audience::Everyone).await?;
    engine.advance(TimeDelta::days(40));
    engine.post(alice.id, Audience::Everyone).await?;

    let july = MemoriesService::new(&engine.ctx)
        .month(alice.id, 2025, 7)
        .await?;
    let ids: Vec<_> = july.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![first, second]);
    Ok(())
}
