use crate::nn::{GraphError, ModelEngine, Softmax};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_softmax_forward() -> Result<(), GraphError> {
    let mut engine = ModelEngine::new(&["x"], &[&[2, 3]])?;
    engine.add_module(Softmax::new("x")?, None)?;

    let out = engine.forward(&[&[1., 2., 3., 1., 1., 1.]])?;
    let third = 1. / 3.;
    let expected = Tensor::new(
        &[0.09003057, 0.24472847, 0.66524096, third, third, third],
        &[2, 3],
    );
    assert_abs_diff_eq!(out, &expected, epsilon = 1e-5);
    Ok(())
}

#[test]
fn test_softmax_rows_sum_to_one_and_shift_invariant() -> Result<(), GraphError> {
    let mut engine = ModelEngine::new(&["x"], &[&[-1, 4]])?;
    engine.add_module(Softmax::new("x")?, None)?;

    let data = [0.5, -1., 3., 2., 10., 10., 10., 9.];
    let out = engine.forward(&[&data])?.clone();
    for row in out.data_as_slice().chunks(4) {
        assert_abs_diff_eq!(row.iter().sum::<f32>(), 1., epsilon = 1e-5);
    }

    // 每行加上同一常数（含大数，验证数值稳定）结果不变
    let shifted: Vec<f32> = data.iter().map(|v| v + 100.).collect();
    let out_shifted = engine.forward(&[&shifted])?;
    assert_abs_diff_eq!(out_shifted, &out, epsilon = 1e-5);
    Ok(())
}
