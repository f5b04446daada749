//! Integration test: sequences refuse to run against moved storage.
//!
//! Freeing or resizing an arena allocation after recording must make
//! `invoke` fail before any write happens, and rebinding to fresh
//! handles must make the sequence usable again.

use matseq_arena::{ArenaError, StorageArena};
use matseq_core::Generation;
use matseq_engine::kernels::IDENTITY;
use matseq_engine::{DispatchBridge, DispatchError, MatrixRecorder, Sequence};
use matseq_test_utils::{random_matrix, translation};

fn record_mul(arena: &mut StorageArena, a: [f32; 16], b: [f32; 16]) -> Sequence {
    let ma = arena.alloc_from(&a).unwrap();
    let mb = arena.alloc_from(&b).unwrap();
    let mut rec = MatrixRecorder::new(arena.whole(ma).unwrap()).unwrap();
    rec.mul_matrix(&arena.whole(mb).unwrap()).unwrap();
    DispatchBridge::interpreting().terminate(rec).unwrap()
}

#[test]
fn resized_operand_blocks_invocation() {
    let mut arena = StorageArena::new();
    let a = random_matrix(5);
    let ma = arena.alloc_from(&a).unwrap();
    let mb = arena.alloc_from(&translation(1.0, 1.0, 1.0)).unwrap();
    let mut rec = MatrixRecorder::new(arena.whole(ma).unwrap()).unwrap();
    rec.mul_matrix(&arena.whole(mb).unwrap()).unwrap();
    let seq = DispatchBridge::interpreting().terminate(rec).unwrap();

    arena.resize(mb, 32).unwrap();
    let err = seq.invoke(&mut arena).unwrap_err();
    assert_eq!(
        err,
        DispatchError::Storage(ArenaError::StaleHandle {
            storage: mb,
            handle_generation: Generation(0),
            current_generation: Generation(1),
        })
    );
    assert_eq!(arena.read(ma).unwrap(), &a);
}

#[test]
fn freed_target_blocks_invocation() {
    let mut arena = StorageArena::new();
    let seq = record_mul(&mut arena, IDENTITY, IDENTITY);
    let target = seq.referenced()[0].key().unwrap().storage;
    arena.free(target).unwrap();
    assert!(matches!(
        seq.invoke(&mut arena),
        Err(DispatchError::Storage(ArenaError::UnknownStorage { .. }))
    ));
}

#[test]
fn other_arena_is_rejected() {
    let mut arena = StorageArena::new();
    let seq = record_mul(&mut arena, IDENTITY, IDENTITY);
    let mut other = StorageArena::new();
    assert!(matches!(
        seq.invoke(&mut other),
        Err(DispatchError::Storage(ArenaError::UnknownStorage { .. }))
    ));
}

#[test]
fn rebinding_to_fresh_handles_recovers() {
    let mut arena = StorageArena::new();
    let ma = arena.alloc_from(&IDENTITY).unwrap();
    let mb = arena.alloc_from(&translation(2.0, 0.0, 0.0)).unwrap();
    let mut rec = MatrixRecorder::new(arena.whole(ma).unwrap()).unwrap();
    rec.mul_matrix(&arena.whole(mb).unwrap()).unwrap();
    let mut seq = DispatchBridge::interpreting().terminate(rec).unwrap();

    arena.resize(ma, 16).unwrap();
    assert!(seq.invoke(&mut arena).is_err());

    let previous = seq
        .bind(&[arena.whole(ma).unwrap(), arena.whole(mb).unwrap()])
        .unwrap();
    assert!(previous.is_some());
    seq.invoke(&mut arena).unwrap();
    assert_eq!(arena.read(ma).unwrap()[12], 2.0);
}

#[test]
fn rebinding_redirects_to_other_storage() {
    let mut arena = StorageArena::new();
    let ma = arena.alloc_from(&IDENTITY).unwrap();
    let mb = arena.alloc_from(&translation(0.0, 3.0, 0.0)).unwrap();
    let mc = arena.alloc_from(&IDENTITY).unwrap();
    let mut rec = MatrixRecorder::new(arena.whole(ma).unwrap()).unwrap();
    rec.mul_matrix(&arena.whole(mb).unwrap()).unwrap();
    let mut seq = DispatchBridge::interpreting().terminate(rec).unwrap();

    seq.bind(&[arena.whole(mc).unwrap(), arena.whole(mb).unwrap()])
        .unwrap();
    seq.invoke(&mut arena).unwrap();
    assert_eq!(arena.read(ma).unwrap(), &IDENTITY);
    assert_eq!(arena.read(mc).unwrap()[13], 3.0);
}

#[test]
fn sub_view_operands_address_inside_storage() {
    let mut arena = StorageArena::new();
    let m = arena.alloc_from(&translation(5.0, 0.0, 0.0)).unwrap();
    // Two homogeneous points packed in one allocation.
    let points = arena
        .alloc_from(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0])
        .unwrap();
    let whole = arena.whole(points).unwrap();
    let mut rec = MatrixRecorder::new(arena.whole(m).unwrap()).unwrap();
    rec.mul_vector(&whole.sub_view(4, 4).unwrap()).unwrap();
    let seq = DispatchBridge::interpreting().terminate(rec).unwrap();
    seq.invoke(&mut arena).unwrap();
    assert_eq!(
        arena.read(points).unwrap(),
        &[0.0, 0.0, 0.0, 1.0, 6.0, 1.0, 1.0, 1.0]
    );
}
