use super::*;

#[test]
fn pixel_reads_straight_and_premultiplied_data() {
    let straight = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![10, 20, 30, 255, 200, 100, 0, 128],
        premultiplied: false,
    };
    assert_eq!(straight.pixel(0, 0), Some([10, 20, 30, 255]));
    assert_eq!(straight.pixel(1, 0), Some([200, 100, 0, 128]));
    assert_eq!(straight.pixel(2, 0), None);
    assert_eq!(straight.pixel(0, 1), None);

    let premul = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 128, 128],
        premultiplied: true,
    };
    assert_eq!(premul.pixel(0, 0), Some([128, 0, 255, 128]));
}
