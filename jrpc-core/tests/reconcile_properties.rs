// Property tests for the serialize -> respond -> reconcile round trip.

use jrpc_core::{parse, BatchRequest, Id, Params, PendingCall, ReturnType, Shape};
use proptest::prelude::*;
use serde_json::{json, Value};

fn build_batch(ids: &[Id]) -> BatchRequest<i64> {
    let calls = ids
        .iter()
        .map(|id| PendingCall::new(id.clone(), "echo", Params::from_args([id.to_string()]).unwrap()))
        .collect();
    BatchRequest::new(calls, Some(ReturnType::of()), None).unwrap()
}

/// Answers every request in the encoded batch, in the order given by `order`.
fn respond(encoded: &str, order: &[usize]) -> String {
    let requests: Vec<Value> = serde_json::from_str(encoded).unwrap();
    let responses: Vec<Value> = order
        .iter()
        .map(|&i| json!({"jsonrpc": "2.0", "id": requests[i]["id"], "result": i as i64}))
        .collect();
    serde_json::to_string(&responses).unwrap()
}

fn mixed_ids(count: usize) -> Vec<Id> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                Id::Number(i as i64)
            } else {
                Id::String(format!("call-{i}"))
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn successes_cover_every_call_regardless_of_order(
        order in (1usize..40).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let ids = mixed_ids(order.len());
        let batch = build_batch(&ids);
        let encoded = batch.encode().unwrap();

        let envelopes = parse(&respond(&encoded, &order), Shape::Batch).unwrap();
        let outcome = batch.reconcile(envelopes).unwrap();

        prop_assert!(outcome.is_success());
        prop_assert_eq!(outcome.successes.len(), ids.len());
        for (index, id) in ids.iter().enumerate() {
            prop_assert_eq!(outcome.success(id), Some(&(index as i64)));
        }
        // Arrival order is preserved.
        let arrival: Vec<&Id> = outcome.successes.keys().collect();
        let expected: Vec<&Id> = order.iter().map(|&i| &ids[i]).collect();
        prop_assert_eq!(arrival, expected);
    }

    #[test]
    fn unsolicited_id_never_yields_successes(count in 1usize..20, stray in 1000i64..2000) {
        let ids = mixed_ids(count);
        let batch = build_batch(&ids);
        let order: Vec<usize> = (0..count).collect();

        let mut responses: Vec<Value> = serde_json::from_str(&respond(&batch.encode().unwrap(), &order)).unwrap();
        responses.push(json!({"jsonrpc": "2.0", "id": stray, "result": 0}));
        let text = serde_json::to_string(&responses).unwrap();

        let envelopes = parse(&text, Shape::Batch).unwrap();
        let err = batch.reconcile(envelopes).unwrap_err();
        prop_assert_eq!(err.to_string(), format!("Unspecified id: '{}' in response", stray));
    }
}
