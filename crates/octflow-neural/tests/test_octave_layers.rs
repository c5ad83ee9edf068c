use approx::assert_relative_eq;
use octflow_core::{ops, Result, Tensor};
use octflow_neural::{OctConv3D, OctConv3DConfig, OctavePair, OctavePosition, OctaveTensor};

fn config(
    in_channels: usize,
    out_channels: usize,
    position: OctavePosition,
    stride: usize,
) -> OctConv3DConfig {
    OctConv3DConfig::new(in_channels, out_channels, (3, 3, 3))
        .with_padding((1, 1, 1))
        .with_stride(stride)
        .with_position(position)
}

fn unit_kernels(config: OctConv3DConfig) -> Result<OctConv3D<f32>> {
    let mut layer = OctConv3D::new(config.with_bias(false))?;
    for param in layer.parameters_mut() {
        let dims = param.shape().to_vec();
        *param = Tensor::ones(&dims);
    }
    Ok(layer)
}

fn ramp(shape: &[usize], offset: f32) -> Result<Tensor<f32>> {
    let len = shape.iter().product::<usize>();
    Tensor::from_vec((0..len).map(|i| i as f32 + offset).collect(), shape)
}

#[test]
fn test_entry_stride_one_shapes() -> Result<()> {
    let entry = OctConv3D::<f32>::new(config(8, 16, OctavePosition::Entry, 1))?;
    let out = entry
        .forward(&Tensor::zeros(&[1, 8, 16, 16, 16]).into())?
        .into_pair()?;

    assert_eq!(out.high.shape().dims(), &[1, 12, 16, 16, 16]);
    assert_eq!(out.low.shape().dims(), &[1, 4, 8, 8, 8]);
    assert!(out.is_half_resolution());
    Ok(())
}

#[test]
fn test_entry_stride_two_shapes() -> Result<()> {
    let entry = OctConv3D::<f32>::new(config(8, 16, OctavePosition::Entry, 2))?;
    let out = entry.forward_entry(&Tensor::zeros(&[1, 8, 16, 16, 16]))?;

    assert_eq!(out.high.shape().dims(), &[1, 12, 8, 8, 8]);
    assert_eq!(out.low.shape().dims(), &[1, 4, 4, 4, 4]);
    Ok(())
}

#[test]
fn test_entry_interior_exit_chain() -> Result<()> {
    let entry = OctConv3D::<f32>::new(config(8, 16, OctavePosition::Entry, 1))?;
    let interior = OctConv3D::<f32>::new(config(16, 16, OctavePosition::Interior, 1))?;
    let exit = OctConv3D::<f32>::new(config(16, 10, OctavePosition::Exit, 1))?;

    let split = exit.split();
    assert_eq!((split.hf_in, split.lf_in), (12, 4));

    let pair = entry.forward(&Tensor::zeros(&[1, 8, 16, 16, 16]).into())?;
    let pair = interior.forward(&pair)?;
    {
        let pair = pair.as_pair().unwrap();
        assert_eq!(pair.high.shape().dims(), &[1, 12, 16, 16, 16]);
        assert_eq!(pair.low.shape().dims(), &[1, 4, 8, 8, 8]);
    }

    let out = exit.forward(&pair)?.into_single()?;
    assert_eq!(out.shape().dims(), &[1, 10, 16, 16, 16]);
    Ok(())
}

#[test]
fn test_interior_stride_two_keeps_half_resolution() -> Result<()> {
    let interior = OctConv3D::<f32>::new(config(16, 24, OctavePosition::Interior, 2))?;
    let out = interior.forward_interior(&OctavePair::new(
        Tensor::zeros(&[2, 12, 8, 8, 8]),
        Tensor::zeros(&[2, 4, 4, 4, 4]),
    ))?;

    assert_eq!(out.high.shape().dims(), &[2, 18, 4, 4, 4]);
    assert_eq!(out.low.shape().dims(), &[2, 6, 2, 2, 2]);
    assert!(out.is_half_resolution());
    Ok(())
}

#[test]
fn test_interior_stride_two_values_with_unit_kernels() -> Result<()> {
    let interior = unit_kernels(
        OctConv3DConfig::new(4, 4, (1, 1, 1))
            .with_alphas(0.5, 0.5)
            .with_stride(2),
    )?;
    let high = ramp(&[1, 2, 4, 4, 4], 0.0)?;
    let low = ramp(&[1, 2, 2, 2, 2], 100.0)?;

    let out = interior.forward_interior(&OctavePair::new(high.clone(), low.clone()))?;
    assert_eq!(out.high.shape().dims(), &[1, 2, 2, 2, 2]);
    assert_eq!(out.low.shape().dims(), &[1, 2, 1, 1, 1]);

    // high = h2h(down(hf)) + l2h(lf), with no upsampling of the low branch
    let down = ops::avg_pool3d(&high, (2, 2, 2), (2, 2, 2))?;
    for d in 0..2 {
        for h in 0..2 {
            for w in 0..2 {
                let expected = down.get(&[0, 0, d, h, w]).unwrap()
                    + down.get(&[0, 1, d, h, w]).unwrap()
                    + low.get(&[0, 0, d, h, w]).unwrap()
                    + low.get(&[0, 1, d, h, w]).unwrap();
                for c in 0..2 {
                    assert_relative_eq!(out.high.get(&[0, c, d, h, w]).unwrap(), expected);
                }
            }
        }
    }
    // First block: means 10.5 and 74.5 of the high channels plus 100 and 108
    assert_relative_eq!(out.high.get(&[0, 0, 0, 0, 0]).unwrap(), 293.0);

    // low = l2l(pool(lf)) + h2l(pool(down(hf))): channel means 103.5 + 111.5 + 31.5 + 95.5
    for value in out.low.to_vec() {
        assert_relative_eq!(value, 342.0);
    }
    Ok(())
}

#[test]
fn test_exit_stride_two_resolves_to_low_resolution() -> Result<()> {
    let exit = OctConv3D::<f32>::new(config(16, 10, OctavePosition::Exit, 2))?;
    let out = exit.forward_exit(&OctavePair::new(
        Tensor::zeros(&[1, 12, 8, 8, 8]),
        Tensor::zeros(&[1, 4, 4, 4, 4]),
    ))?;
    assert_eq!(out.shape().dims(), &[1, 10, 4, 4, 4]);
    Ok(())
}

#[test]
fn test_channel_counts_independent_of_resolution() -> Result<()> {
    let interior = OctConv3D::<f32>::interior(10, 14, (1, 1, 1), 0.5)?;
    let split = interior.split();
    for extent in [2, 4, 6] {
        let out = interior.forward_interior(&OctavePair::new(
            Tensor::zeros(&[1, split.hf_in, extent, extent, extent]),
            Tensor::zeros(&[1, split.lf_in, extent / 2, extent / 2, extent / 2]),
        ))?;
        assert_eq!(out.channels(), Some((split.hf_out, split.lf_out)));
        assert_eq!(split.hf_out + split.lf_out, 14);
    }
    Ok(())
}

#[test]
fn test_exit_sums_high_and_upsampled_low() -> Result<()> {
    let exit = unit_kernels(
        OctConv3DConfig::new(4, 1, (1, 1, 1))
            .with_alpha_in(0.5)
            .with_position(OctavePosition::Exit),
    )?;
    let high = ramp(&[1, 2, 2, 2, 2], 0.0)?;
    let low = Tensor::from_vec(vec![10.0, 100.0], &[1, 2, 1, 1, 1])?;

    let out = exit.forward_exit(&OctavePair::new(high.clone(), low))?;
    assert_eq!(out.shape().dims(), &[1, 1, 2, 2, 2]);
    for d in 0..2 {
        for h in 0..2 {
            for w in 0..2 {
                let expected = high.get(&[0, 0, d, h, w]).unwrap()
                    + high.get(&[0, 1, d, h, w]).unwrap()
                    + 110.0;
                assert_relative_eq!(out.get(&[0, 0, d, h, w]).unwrap(), expected);
            }
        }
    }
    Ok(())
}

#[test]
fn test_exit_stride_two_pools_high_branch() -> Result<()> {
    let exit = unit_kernels(
        OctConv3DConfig::new(2, 1, (1, 1, 1))
            .with_alpha_in(0.5)
            .with_stride(2)
            .with_position(OctavePosition::Exit),
    )?;
    // Single high channel 0..8 averages to 3.5 over the 2x2x2 block
    let high = ramp(&[1, 1, 2, 2, 2], 0.0)?;
    let low = Tensor::full(&[1, 1, 1, 1, 1], 2.0);

    let out = exit.forward_exit(&OctavePair::new(high, low))?;
    assert_eq!(out.shape().dims(), &[1, 1, 1, 1, 1]);
    assert_relative_eq!(out.get(&[0, 0, 0, 0, 0]).unwrap(), 5.5);
    Ok(())
}

#[test]
fn test_entry_values_with_unit_kernels() -> Result<()> {
    let entry = unit_kernels(
        OctConv3DConfig::new(3, 4, (1, 1, 1))
            .with_alpha_out(0.5)
            .with_position(OctavePosition::Entry),
    )?;
    let out = entry.forward_entry(&Tensor::full(&[1, 3, 4, 4, 4], 2.0))?;
    assert_eq!(out.channels(), Some((2, 2)));
    for value in out.high.to_vec().into_iter().chain(out.low.to_vec()) {
        assert_relative_eq!(value, 6.0);
    }
    Ok(())
}

#[test]
fn test_bias_is_added_per_kernel() -> Result<()> {
    let mut exit = OctConv3D::<f32>::new(
        OctConv3DConfig::new(2, 1, (1, 1, 1))
            .with_alpha_in(0.5)
            .with_position(OctavePosition::Exit),
    )?;
    let routing = exit.routing_mut();
    for name in ["conv_high", "conv_low"] {
        let kernel = routing.kernel_mut(name).unwrap();
        octflow_neural::Layer::set_bias(kernel, Some(Tensor::full(&[1], 0.5)))?;
    }

    let out = exit.forward_exit(&OctavePair::new(
        Tensor::zeros(&[1, 1, 2, 2, 2]),
        Tensor::zeros(&[1, 1, 1, 1, 1]),
    ))?;
    for value in out.to_vec() {
        assert_relative_eq!(value, 1.0);
    }
    Ok(())
}

#[test]
fn test_wrong_channel_count_is_shape_mismatch() {
    let entry = OctConv3D::<f32>::new(config(8, 16, OctavePosition::Entry, 1)).unwrap();
    let err = entry
        .forward(&OctaveTensor::from(Tensor::zeros(&[1, 6, 8, 8, 8])))
        .unwrap_err();
    assert!(err.is_shape_mismatch());
}

#[test]
fn test_inconsistent_pair_resolution_is_shape_mismatch() {
    let interior = OctConv3D::<f32>::new(config(16, 16, OctavePosition::Interior, 1)).unwrap();
    // An odd high extent leaves the upsampled low branch one voxel short
    let err = interior
        .forward_interior(&OctavePair::new(
            Tensor::zeros(&[1, 12, 9, 9, 9]),
            Tensor::zeros(&[1, 4, 4, 4, 4]),
        ))
        .unwrap_err();
    assert!(err.is_shape_mismatch());

    let exit = OctConv3D::<f32>::new(config(16, 10, OctavePosition::Exit, 1)).unwrap();
    let err = exit
        .forward_exit(&OctavePair::new(
            Tensor::zeros(&[1, 12, 8, 8, 8]),
            Tensor::zeros(&[1, 4, 8, 8, 8]),
        ))
        .unwrap_err();
    assert!(err.is_shape_mismatch());
}

#[test]
fn test_configuration_errors() {
    let err = OctConv3D::<f32>::new(config(8, 16, OctavePosition::Entry, 3)).unwrap_err();
    assert!(err.is_configuration_error());

    let err = OctConv3D::<f32>::new(
        config(16, 16, OctavePosition::Interior, 1).with_alpha_in(1.0),
    )
    .unwrap_err();
    assert!(err.is_configuration_error());

    // A single input channel leaves the high input branch empty
    let err = OctConv3D::<f32>::new(config(1, 16, OctavePosition::Interior, 1)).unwrap_err();
    assert!(err.is_configuration_error());
    assert!(err.to_string().contains("h2h"));

    let exit = config(16, 10, OctavePosition::Exit, 1).with_alpha_out(1.0);
    let err = OctConv3D::<f32>::new(exit).unwrap_err();
    assert!(err.is_configuration_error());

    let err = OctConv3D::<f32>::new(config(0, 16, OctavePosition::Entry, 1)).unwrap_err();
    assert!(err.is_configuration_error());
}

#[test]
fn test_layer_from_json_config() -> Result<()> {
    let config: OctConv3DConfig = serde_json::from_str(
        r#"{
            "in_channels": 16,
            "out_channels": 10,
            "kernel_size": [1, 1, 1],
            "alpha_in": 0.25,
            "position": "last"
        }"#,
    )
    .unwrap();
    let exit = OctConv3D::<f32>::new(config)?;
    assert_eq!(exit.position(), OctavePosition::Exit);
    assert_eq!(exit.stride(), 1);
    assert!(exit.config().use_bias);
    assert_eq!(exit.parameters().len(), 4);

    let out = exit.forward_exit(&OctavePair::new(
        Tensor::zeros(&[1, 12, 4, 4, 4]),
        Tensor::zeros(&[1, 4, 2, 2, 2]),
    ))?;
    assert_eq!(out.shape().dims(), &[1, 10, 4, 4, 4]);
    Ok(())
}
