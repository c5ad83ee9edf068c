use approx::assert_relative_eq;
use octflow::prelude::*;

/// Entry -> interior -> exit, the way an octave network wraps its body
struct OctaveStack {
    entry: OctConv3D<f32>,
    body: Vec<OctConv3D<f32>>,
    exit: OctConv3D<f32>,
}

impl OctaveStack {
    fn new(in_channels: usize, width: usize, out_channels: usize, depth: usize) -> Result<Self> {
        let body = (0..depth)
            .map(|_| OctConv3D::interior(width, width, (3, 3, 3), 0.25))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            entry: OctConv3D::entry(in_channels, width, (3, 3, 3), 0.25)?,
            body,
            exit: OctConv3D::exit(width, out_channels, (3, 3, 3), 0.25)?,
        })
    }

    fn forward(&self, input: Tensor<f32>) -> Result<Tensor<f32>> {
        let mut x = self.entry.forward(&input.into())?;
        for layer in &self.body {
            x = layer.forward(&x)?;
        }
        self.exit.forward(&x)?.into_single()
    }

    fn parameter_count(&self) -> usize {
        std::iter::once(&self.entry)
            .chain(&self.body)
            .chain(std::iter::once(&self.exit))
            .flat_map(|layer| layer.parameters())
            .map(|param| param.numel())
            .sum()
    }
}

#[test]
fn test_stack_preserves_resolution() -> Result<()> {
    let stack = OctaveStack::new(2, 8, 3, 2)?;
    let output = stack.forward(Tensor::ones(&[1, 2, 8, 8, 8]))?;
    assert_eq!(output.shape().dims(), &[1, 3, 8, 8, 8]);
    // Zero-initialised kernels and biases
    assert!(output.to_vec().iter().all(|v| *v == 0.0));
    Ok(())
}

#[test]
fn test_stack_parameter_count() -> Result<()> {
    let stack = OctaveStack::new(2, 8, 3, 1)?;
    // width 8 at alpha 0.25 splits 6 / 2
    let taps = 27;
    let entry = 2 * 6 * taps + 6 + 2 * 2 * taps + 2;
    let interior = (6 * 6 + 6 * 2 + 2 * 6 + 2 * 2) * taps + (6 + 2 + 6 + 2);
    let exit = 6 * 3 * taps + 3 + 2 * 3 * taps + 3;
    assert_eq!(stack.parameter_count(), entry + interior + exit);
    Ok(())
}

#[test]
fn test_downsampling_stage() -> Result<()> {
    let entry = OctConv3D::<f32>::entry(4, 8, (1, 1, 1), 0.5)?;
    let down = OctConv3D::<f32>::new(
        OctConv3DConfig::new(8, 16, (3, 3, 3))
            .with_padding((1, 1, 1))
            .with_stride(2)
            .with_alphas(0.5, 0.5),
    )?;

    let input = Tensor::zeros(&[1, 4, 16, 16, 16]);
    let pair = down.forward_interior(&entry.forward_entry(&input)?)?;
    assert_eq!(pair.high.shape().dims(), &[1, 8, 8, 8, 8]);
    assert_eq!(pair.low.shape().dims(), &[1, 8, 4, 4, 4]);
    Ok(())
}

#[test]
fn test_core_ops_through_prelude() -> Result<()> {
    let x = Tensor::from_vec((0..8).map(|v| v as f32).collect(), &[1, 1, 2, 2, 2])?;
    let pooled = ops::avg_pool3d(&x, (2, 2, 2), (2, 2, 2))?;
    assert_relative_eq!(pooled.get(&[0, 0, 0, 0, 0]).unwrap(), 3.5);

    let restored = ops::upsample_nearest3d(&pooled, (2, 2, 2))?;
    let residual = ops::add(&x, &restored)?;
    assert_relative_eq!(residual.get(&[0, 0, 1, 1, 1]).unwrap(), 10.5);

    let err = ops::add(&x, &pooled).unwrap_err();
    assert!(matches!(err, TensorError::ShapeMismatch { .. }));
    Ok(())
}
