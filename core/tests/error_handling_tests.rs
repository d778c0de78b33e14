// tests/error_handling_tests.rs
mod common;

use common::*;
use shopkeep_flow::{ContextData, FlowError, Pipeline, PipelineControl};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn pipeline_can_use_flow_error_directly() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, FlowError>::new(&[("reserve", false, None)]);
  pipeline.on_root("reserve", |ctx: ContextData<TallyContext>| {
    Box::pin(async move {
      ctx.write().units_reserved = 1;
      Ok::<_, FlowError>(PipelineControl::Continue)
    })
  });

  let ctx = ContextData::new(TallyContext::default());
  assert!(pipeline.run(ctx.clone()).await.is_ok());
  assert_eq!(ctx.read().units_reserved, 1);

  let mut failing = Pipeline::<TallyContext, FlowError>::new(&[("reserve", false, None)]);
  failing.on_root("reserve", |_ctx| {
    Box::pin(async move { Err(FlowError::Internal("ledger offline".to_string())) })
  });
  match failing.run(ContextData::new(TallyContext::default())).await {
    Err(FlowError::Internal(s)) => assert_eq!(s, "ledger offline"),
    other => panic!("expected FlowError::Internal, got {other:?}"),
  }
}

#[tokio::test]
#[serial]
async fn anyhow_errors_convert_into_handler_error() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, FlowError>::new(&[("reserve", false, None)]);
  pipeline.on_root("reserve", |_ctx| {
    Box::pin(async move { Err::<PipelineControl, anyhow::Error>(anyhow::anyhow!("disk full")) })
  });

  let err = pipeline.run(ContextData::new(TallyContext::default())).await.unwrap_err();
  assert!(matches!(err, FlowError::HandlerError { .. }));
  assert!(err.to_string().contains("disk full"));
}

#[tokio::test]
#[serial]
async fn narrower_handler_errors_are_converted_into_pipeline_error() {
  setup_tracing();
  let mut pipeline = Pipeline::<TallyContext, TestError>::new(&[("reserve", false, None)]);
  pipeline.on_root("reserve", |_ctx| {
    Box::pin(async move {
      Err::<PipelineControl, FlowError>(FlowError::Internal("converted".to_string()))
    })
  });

  let err = pipeline.run(ContextData::new(TallyContext::default())).await.unwrap_err();
  match err {
    TestError::Flow(s) => assert!(s.contains("converted")),
    other => panic!("expected TestError::Flow, got {other:?}"),
  }
}
